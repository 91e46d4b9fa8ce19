//! Plugin config repository for database operations.

use sqlx::PgPool;

use crate::entities::PluginConfigEntity;

/// Repository for the plugin_config key/value store.
#[derive(Clone)]
pub struct PluginConfigRepository {
    pool: PgPool,
}

impl PluginConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Write a setting value, overwriting any existing one.
    pub async fn upsert(
        &self,
        name: &str,
        value: serde_json::Value,
    ) -> Result<PluginConfigEntity, sqlx::Error> {
        sqlx::query_as::<_, PluginConfigEntity>(
            r#"
            INSERT INTO plugin_config (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE
            SET value = $2, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(value)
        .fetch_one(&self.pool)
        .await
    }

    /// Get one persisted setting by name.
    pub async fn get(&self, name: &str) -> Result<Option<PluginConfigEntity>, sqlx::Error> {
        sqlx::query_as::<_, PluginConfigEntity>(
            r#"
            SELECT * FROM plugin_config WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    /// All persisted settings, by name.
    pub async fn list(&self) -> Result<Vec<PluginConfigEntity>, sqlx::Error> {
        sqlx::query_as::<_, PluginConfigEntity>(
            r#"
            SELECT * FROM plugin_config ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
