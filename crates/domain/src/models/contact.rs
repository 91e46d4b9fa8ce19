//! Contact domain model.
//!
//! A contact is the local representation of an Arlo person record linked to
//! a platform user account. At most one contact exists per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An Arlo contact linked to a local user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    /// Numeric identifier of the person on the Arlo platform.
    pub source_id: i64,
    /// Stable GUID of the person on the Arlo platform.
    pub source_guid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_work: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_mobile: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
