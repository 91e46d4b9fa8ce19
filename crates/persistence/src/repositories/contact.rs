//! Contact repository for database operations.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::ContactEntity;

/// Input for creating a contact during sync.
#[derive(Debug, Clone)]
pub struct CreateContactInput {
    pub user_id: i64,
    pub source_id: i64,
    pub source_guid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub code_primary: Option<String>,
    pub phone_work: Option<String>,
    pub phone_mobile: Option<String>,
}

/// Repository for contact database operations.
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a contact for a user. Fails on the unique user constraint if
    /// one already exists.
    pub async fn create(&self, input: CreateContactInput) -> Result<ContactEntity, sqlx::Error> {
        sqlx::query_as::<_, ContactEntity>(
            r#"
            INSERT INTO contacts (
                user_id, source_id, source_guid, first_name, last_name,
                email, code_primary, phone_work, phone_mobile
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(input.user_id)
        .bind(input.source_id)
        .bind(input.source_guid)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.code_primary)
        .bind(&input.phone_work)
        .bind(&input.phone_mobile)
        .fetch_one(&self.pool)
        .await
    }

    /// Find the contact linked to a user, if any.
    pub async fn find_by_user(&self, user_id: i64) -> Result<Option<ContactEntity>, sqlx::Error> {
        sqlx::query_as::<_, ContactEntity>(
            r#"
            SELECT * FROM contacts WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a user's contact. Takes a connection so the caller can run it
    /// inside an erasure transaction.
    pub async fn delete_by_user(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
