//! Group membership repository and the Postgres-backed group privacy
//! collaborator.
//!
//! Group rows are owned by the host's group subsystem; the privacy engine
//! never deletes them directly and instead goes through the
//! [`GroupPrivacy`] trait, implemented here over the group_memberships
//! table.

use domain::models::PrivacyContext;
use domain::services::GroupPrivacy;
use sqlx::PgPool;
use tracing::debug;

/// Repository for group membership rows. Used by sync when placing enrolled
/// users into course groups, and by test fixtures.
#[derive(Clone)]
pub struct GroupMembershipRepository {
    pool: PgPool,
}

impl GroupMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a membership tagged with the creating component.
    pub async fn add(
        &self,
        course_id: i64,
        user_id: i64,
        component: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO group_memberships (course_id, user_id, component)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .bind(component)
        .fetch_one(&self.pool)
        .await
    }

    /// Memberships remaining in a course for one component.
    pub async fn count_for_course(
        &self,
        course_id: i64,
        component: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM group_memberships WHERE course_id = $1 AND component = $2
            "#,
        )
        .bind(course_id)
        .bind(component)
        .fetch_one(&self.pool)
        .await
    }
}

/// Postgres-backed [`GroupPrivacy`] collaborator.
#[derive(Clone)]
pub struct PgGroupPrivacy {
    pool: PgPool,
}

impl PgGroupPrivacy {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GroupPrivacy for PgGroupPrivacy {
    async fn delete_groups_for_all_users(
        &self,
        context: PrivacyContext,
        component: &str,
    ) -> Result<u64, sqlx::Error> {
        let Some(course_id) = context.course_id() else {
            return Ok(0);
        };
        let result =
            sqlx::query("DELETE FROM group_memberships WHERE course_id = $1 AND component = $2")
                .bind(course_id)
                .bind(component)
                .execute(&self.pool)
                .await?;
        debug!(course_id, deleted = result.rows_affected(), "Group cleanup for context");
        Ok(result.rows_affected())
    }

    async fn delete_groups_for_user(
        &self,
        user_id: i64,
        contexts: &[PrivacyContext],
        component: &str,
    ) -> Result<u64, sqlx::Error> {
        let course_ids = PrivacyContext::course_ids(contexts);
        if course_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            r#"
            DELETE FROM group_memberships
             WHERE user_id = $1 AND course_id = ANY($2) AND component = $3
            "#,
        )
        .bind(user_id)
        .bind(&course_ids)
        .bind(component)
        .execute(&self.pool)
        .await?;
        debug!(user_id, deleted = result.rows_affected(), "Group cleanup for user");
        Ok(result.rows_affected())
    }

    async fn delete_groups_for_users(
        &self,
        context: PrivacyContext,
        user_ids: &[i64],
        component: &str,
    ) -> Result<u64, sqlx::Error> {
        let Some(course_id) = context.course_id() else {
            return Ok(0);
        };
        if user_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            r#"
            DELETE FROM group_memberships
             WHERE course_id = $1 AND user_id = ANY($2) AND component = $3
            "#,
        )
        .bind(course_id)
        .bind(user_ids)
        .bind(component)
        .execute(&self.pool)
        .await?;
        debug!(course_id, deleted = result.rows_affected(), "Group cleanup for user batch");
        Ok(result.rows_affected())
    }
}
