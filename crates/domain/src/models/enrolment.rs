//! Enrolment instance domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an enrolment instance is processed by synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrolmentStatus {
    Enabled,
    Disabled,
}

impl std::fmt::Display for EnrolmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrolmentStatus::Enabled => write!(f, "enabled"),
            EnrolmentStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// A course-scoped enrolment configuration record. Owns zero or more
/// registrations; deleting an instance cascades to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolmentInstance {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub status: EnrolmentStatus,
    /// Arlo platform host this instance syncs against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Identifier pair of the linked event or online activity on Arlo.
    pub source_id: i64,
    pub source_guid: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
