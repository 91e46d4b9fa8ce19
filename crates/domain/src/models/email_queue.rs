//! Email queue domain model.
//!
//! Outbound emails raised by enrolment processing are queued rather than
//! sent inline. Queue draining is owned by a separate worker; this crate
//! only models the rows for privacy export and erasure purposes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which surface a queued email belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailArea {
    /// Site-level mail, tied to the plugin as a whole.
    Site,
    /// Enrolment-level mail, tied to one enrolment instance.
    Enrolment,
}

impl std::fmt::Display for EmailArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailArea::Site => write!(f, "site"),
            EmailArea::Enrolment => write!(f, "enrolment"),
        }
    }
}

/// Delivery state of a queued email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Queued,
    Delivered,
    Failed,
}

impl std::fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailStatus::Queued => write!(f, "queued"),
            EmailStatus::Delivered => write!(f, "delivered"),
            EmailStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A queued outbound email tied to a user and an area instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailQueueEntry {
    pub id: i64,
    pub area: EmailArea,
    /// Enrolment instance id for enrolment-area mail, plugin instance id
    /// for site-area mail.
    pub instance_id: i64,
    pub user_id: i64,
    /// Message kind, e.g. `newaccountdetails` or `coursewelcome`.
    pub message_type: String,
    pub status: EmailStatus,
    /// Free-form payload the message template is rendered from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_area_display() {
        assert_eq!(EmailArea::Site.to_string(), "site");
        assert_eq!(EmailArea::Enrolment.to_string(), "enrolment");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(EmailStatus::Queued.to_string(), "queued");
        assert_eq!(EmailStatus::Delivered.to_string(), "delivered");
        assert_eq!(EmailStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_serialization() {
        let entry = EmailQueueEntry {
            id: 5,
            area: EmailArea::Enrolment,
            instance_id: 11,
            user_id: 7,
            message_type: "coursewelcome".to_string(),
            status: EmailStatus::Queued,
            extra: Some(json!({"courseName": "Welding 101"})),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"area\":\"enrolment\""));
        assert!(json.contains("\"messageType\":\"coursewelcome\""));
        assert!(json.contains("\"status\":\"queued\""));
        assert!(json.contains("\"instanceId\":11"));
    }
}
