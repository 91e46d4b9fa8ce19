//! Registration domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A link between a local enrolment instance, a user, and the matching
/// registration on the Arlo platform, including synced progress data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    /// The enrolment instance this registration belongs to.
    pub enrol_id: i64,
    pub user_id: i64,
    pub source_id: i64,
    pub source_guid: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<f64>,
    /// Identifier pair of the contact on the Arlo side this registration
    /// was made for, when it differs from the linked user's contact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_contact_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_contact_guid: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
