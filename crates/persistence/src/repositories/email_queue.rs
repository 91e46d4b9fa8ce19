//! Email queue repository for database operations.

use sqlx::{PgConnection, PgPool};

use crate::entities::{EmailAreaDb, EmailQueueEntity, EmailStatusDb};

/// Input for queueing an outbound email.
#[derive(Debug, Clone)]
pub struct EnqueueEmailInput {
    pub area: EmailAreaDb,
    pub instance_id: i64,
    pub user_id: i64,
    pub message_type: String,
    pub extra: Option<serde_json::Value>,
}

/// Repository for email queue database operations.
#[derive(Clone)]
pub struct EmailQueueRepository {
    pool: PgPool,
}

impl EmailQueueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Queue an email in the `queued` state.
    pub async fn enqueue(&self, input: EnqueueEmailInput) -> Result<EmailQueueEntity, sqlx::Error> {
        sqlx::query_as::<_, EmailQueueEntity>(
            r#"
            INSERT INTO email_queue (area, instance_id, user_id, message_type, status, extra)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.area)
        .bind(input.instance_id)
        .bind(input.user_id)
        .bind(&input.message_type)
        .bind(EmailStatusDb::Queued)
        .bind(&input.extra)
        .fetch_one(&self.pool)
        .await
    }

    /// Every queued email belonging to a user, oldest first. Feeds the
    /// user-context export.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<EmailQueueEntity>, sqlx::Error> {
        sqlx::query_as::<_, EmailQueueEntity>(
            r#"
            SELECT * FROM email_queue WHERE user_id = $1 ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Delete one instance's enrolment-area mail.
    pub async fn delete_enrolment_area_by_instance(
        &self,
        conn: &mut PgConnection,
        instance_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_queue WHERE area = $1 AND instance_id = $2")
            .bind(EmailAreaDb::Enrolment)
            .bind(instance_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete all of a user's mail, regardless of area.
    pub async fn delete_by_user(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_queue WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a user's enrolment-area mail.
    pub async fn delete_enrolment_area_by_user(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_queue WHERE area = $1 AND user_id = $2")
            .bind(EmailAreaDb::Enrolment)
            .bind(user_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete enrolment-area mail for a batch of users against a set of
    /// instances. Short-circuits when either id set is empty.
    pub async fn delete_enrolment_area_by_instances_and_users(
        &self,
        conn: &mut PgConnection,
        instance_ids: &[i64],
        user_ids: &[i64],
    ) -> Result<u64, sqlx::Error> {
        if instance_ids.is_empty() || user_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            r#"
            DELETE FROM email_queue
             WHERE area = $1 AND instance_id = ANY($2) AND user_id = ANY($3)
            "#,
        )
        .bind(EmailAreaDb::Enrolment)
        .bind(instance_ids)
        .bind(user_ids)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
