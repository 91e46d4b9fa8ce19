//! Role entity (database row mapping).

use sqlx::FromRow;

/// Database row mapping for the roles table. Consulted only when the
/// settings installer resolves the default student role.
#[derive(Debug, Clone, FromRow)]
pub struct RoleEntity {
    pub id: i64,
    pub shortname: String,
    pub archetype: String,
    pub sort_order: i32,
}
