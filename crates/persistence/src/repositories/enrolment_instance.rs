//! Enrolment instance repository for database operations.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{EnrolmentInstanceEntity, EnrolmentStatusDb};

/// Input for creating an enrolment instance.
#[derive(Debug, Clone)]
pub struct CreateEnrolmentInstanceInput {
    pub course_id: i64,
    pub name: String,
    pub platform: Option<String>,
    pub source_id: i64,
    pub source_guid: Uuid,
}

/// Repository for enrolment instance database operations.
#[derive(Clone)]
pub struct EnrolmentInstanceRepository {
    pool: PgPool,
}

impl EnrolmentInstanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an enabled enrolment instance in a course.
    pub async fn create(
        &self,
        input: CreateEnrolmentInstanceInput,
    ) -> Result<EnrolmentInstanceEntity, sqlx::Error> {
        sqlx::query_as::<_, EnrolmentInstanceEntity>(
            r#"
            INSERT INTO enrolment_instances (course_id, name, platform, source_id, source_guid)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.course_id)
        .bind(&input.name)
        .bind(&input.platform)
        .bind(input.source_id)
        .bind(input.source_guid)
        .fetch_one(&self.pool)
        .await
    }

    /// Find an instance by id.
    pub async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<EnrolmentInstanceEntity>, sqlx::Error> {
        sqlx::query_as::<_, EnrolmentInstanceEntity>(
            r#"
            SELECT * FROM enrolment_instances WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// All instances in a course, oldest first.
    pub async fn list_by_course(
        &self,
        course_id: i64,
    ) -> Result<Vec<EnrolmentInstanceEntity>, sqlx::Error> {
        sqlx::query_as::<_, EnrolmentInstanceEntity>(
            r#"
            SELECT * FROM enrolment_instances WHERE course_id = $1 ORDER BY id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Instance ids for a set of courses. Short-circuits on an empty input
    /// so no unbounded query is ever issued.
    pub async fn ids_for_courses(&self, course_ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM enrolment_instances WHERE course_id = ANY($1) ORDER BY id
            "#,
        )
        .bind(course_ids)
        .fetch_all(&self.pool)
        .await
    }

    /// Mark an instance disabled so synchronization skips it. Takes a
    /// connection so the caller can run it inside an erasure transaction.
    pub async fn disable(&self, conn: &mut PgConnection, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE enrolment_instances SET status = $2, updated_at = NOW() WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(EnrolmentStatusDb::Disabled)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
