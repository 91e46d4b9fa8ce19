//! Email queue entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{EmailArea, EmailQueueEntry, EmailStatus};
use sqlx::FromRow;

/// Database enum for email_area that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "email_area", rename_all = "lowercase")]
pub enum EmailAreaDb {
    Site,
    Enrolment,
}

impl From<EmailAreaDb> for EmailArea {
    fn from(area: EmailAreaDb) -> Self {
        match area {
            EmailAreaDb::Site => EmailArea::Site,
            EmailAreaDb::Enrolment => EmailArea::Enrolment,
        }
    }
}

impl From<EmailArea> for EmailAreaDb {
    fn from(area: EmailArea) -> Self {
        match area {
            EmailArea::Site => EmailAreaDb::Site,
            EmailArea::Enrolment => EmailAreaDb::Enrolment,
        }
    }
}

/// Database enum for email_status that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "email_status", rename_all = "lowercase")]
pub enum EmailStatusDb {
    Queued,
    Delivered,
    Failed,
}

impl From<EmailStatusDb> for EmailStatus {
    fn from(status: EmailStatusDb) -> Self {
        match status {
            EmailStatusDb::Queued => EmailStatus::Queued,
            EmailStatusDb::Delivered => EmailStatus::Delivered,
            EmailStatusDb::Failed => EmailStatus::Failed,
        }
    }
}

impl From<EmailStatus> for EmailStatusDb {
    fn from(status: EmailStatus) -> Self {
        match status {
            EmailStatus::Queued => EmailStatusDb::Queued,
            EmailStatus::Delivered => EmailStatusDb::Delivered,
            EmailStatus::Failed => EmailStatusDb::Failed,
        }
    }
}

/// Database row mapping for the email_queue table.
#[derive(Debug, Clone, FromRow)]
pub struct EmailQueueEntity {
    pub id: i64,
    pub area: EmailAreaDb,
    pub instance_id: i64,
    pub user_id: i64,
    pub message_type: String,
    pub status: EmailStatusDb,
    pub extra: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmailQueueEntity> for EmailQueueEntry {
    fn from(entity: EmailQueueEntity) -> Self {
        EmailQueueEntry {
            id: entity.id,
            area: entity.area.into(),
            instance_id: entity.instance_id,
            user_id: entity.user_id,
            message_type: entity.message_type,
            status: entity.status.into(),
            extra: entity.extra,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_round_trip() {
        assert_eq!(EmailArea::from(EmailAreaDb::Site), EmailArea::Site);
        assert_eq!(EmailAreaDb::from(EmailArea::Enrolment), EmailAreaDb::Enrolment);
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(EmailStatus::from(EmailStatusDb::Failed), EmailStatus::Failed);
        assert_eq!(EmailStatusDb::from(EmailStatus::Queued), EmailStatusDb::Queued);
    }
}
