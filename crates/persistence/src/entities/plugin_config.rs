//! Plugin config entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the plugin_config key/value table.
#[derive(Debug, Clone, FromRow)]
pub struct PluginConfigEntity {
    pub name: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
