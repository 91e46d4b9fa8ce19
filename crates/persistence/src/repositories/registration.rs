//! Registration repository for database operations.
//!
//! Queries that feed privacy context discovery and export join through the
//! contacts table: a registration whose user has no contact is invisible to
//! the privacy engine, matching how the sync pipeline created it.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::RegistrationEntity;

/// Input for creating a registration during sync.
#[derive(Debug, Clone)]
pub struct CreateRegistrationInput {
    pub enrol_id: i64,
    pub user_id: i64,
    pub source_id: i64,
    pub source_guid: Uuid,
    pub grade: Option<String>,
    pub outcome: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
    pub progress_status: Option<String>,
    pub progress_percent: Option<f64>,
    pub source_contact_id: Option<i64>,
    pub source_contact_guid: Option<Uuid>,
}

/// Repository for registration database operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a registration against an enrolment instance.
    pub async fn create(
        &self,
        input: CreateRegistrationInput,
    ) -> Result<RegistrationEntity, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(
            r#"
            INSERT INTO registrations (
                enrol_id, user_id, source_id, source_guid, grade, outcome,
                last_activity, progress_status, progress_percent,
                source_contact_id, source_contact_guid
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(input.enrol_id)
        .bind(input.user_id)
        .bind(input.source_id)
        .bind(input.source_guid)
        .bind(&input.grade)
        .bind(&input.outcome)
        .bind(input.last_activity)
        .bind(&input.progress_status)
        .bind(input.progress_percent)
        .bind(input.source_contact_id)
        .bind(input.source_contact_guid)
        .fetch_one(&self.pool)
        .await
    }

    /// Distinct course ids where the user holds registrations, joined
    /// through the user's contact.
    pub async fn course_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT ei.course_id
              FROM registrations r
              JOIN enrolment_instances ei ON ei.id = r.enrol_id
              JOIN contacts c ON c.user_id = r.user_id
             WHERE r.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Distinct users with a registration against any instance of the
    /// course, joined through their contacts.
    pub async fn user_ids_in_course(&self, course_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT r.user_id
              FROM registrations r
              JOIN enrolment_instances ei ON ei.id = r.enrol_id
              JOIN contacts c ON c.user_id = r.user_id
             WHERE ei.course_id = $1
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
    }

    /// A user's registrations across all instances of one course, joined
    /// through the user's contact. Feeds the course-context export.
    pub async fn list_for_course_and_user(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Vec<RegistrationEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT r.*
              FROM registrations r
              JOIN enrolment_instances ei ON ei.id = r.enrol_id
              JOIN contacts c ON c.user_id = r.user_id
             WHERE ei.course_id = $1 AND r.user_id = $2
             ORDER BY r.id
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Delete every registration of one enrolment instance.
    pub async fn delete_by_instance(
        &self,
        conn: &mut PgConnection,
        enrol_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM registrations WHERE enrol_id = $1")
            .bind(enrol_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete one user's registrations against the given instances.
    /// Short-circuits on an empty instance set so an empty match list can
    /// never widen into deleting everything.
    pub async fn delete_by_instances_and_user(
        &self,
        conn: &mut PgConnection,
        enrol_ids: &[i64],
        user_id: i64,
    ) -> Result<u64, sqlx::Error> {
        if enrol_ids.is_empty() {
            return Ok(0);
        }
        let result =
            sqlx::query("DELETE FROM registrations WHERE enrol_id = ANY($1) AND user_id = $2")
                .bind(enrol_ids)
                .bind(user_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected())
    }

    /// Delete a batch of users' registrations against the given instances.
    /// Short-circuits when either id set is empty.
    pub async fn delete_by_instances_and_users(
        &self,
        conn: &mut PgConnection,
        enrol_ids: &[i64],
        user_ids: &[i64],
    ) -> Result<u64, sqlx::Error> {
        if enrol_ids.is_empty() || user_ids.is_empty() {
            return Ok(0);
        }
        let result =
            sqlx::query("DELETE FROM registrations WHERE enrol_id = ANY($1) AND user_id = ANY($2)")
                .bind(enrol_ids)
                .bind(user_ids)
                .execute(conn)
                .await?;
        Ok(result.rows_affected())
    }
}
