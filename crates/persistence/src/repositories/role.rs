//! Role repository for database operations.

use sqlx::PgPool;

use crate::entities::RoleEntity;

/// Repository for role lookups.
#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a role. Used by install tooling and test fixtures.
    pub async fn create(
        &self,
        shortname: &str,
        archetype: &str,
        sort_order: i32,
    ) -> Result<RoleEntity, sqlx::Error> {
        sqlx::query_as::<_, RoleEntity>(
            r#"
            INSERT INTO roles (shortname, archetype, sort_order)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(shortname)
        .bind(archetype)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await
    }

    /// The first role carrying an archetype, by sort order. Backs the
    /// deferred `roleid` setting default.
    pub async fn first_id_by_archetype(
        &self,
        archetype: &str,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM roles WHERE archetype = $1 ORDER BY sort_order, id LIMIT 1
            "#,
        )
        .bind(archetype)
        .fetch_optional(&self.pool)
        .await
    }
}
