//! Enrolment instance entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{EnrolmentInstance, EnrolmentStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for enrolment_status that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "enrolment_status", rename_all = "lowercase")]
pub enum EnrolmentStatusDb {
    Enabled,
    Disabled,
}

impl From<EnrolmentStatusDb> for EnrolmentStatus {
    fn from(status: EnrolmentStatusDb) -> Self {
        match status {
            EnrolmentStatusDb::Enabled => EnrolmentStatus::Enabled,
            EnrolmentStatusDb::Disabled => EnrolmentStatus::Disabled,
        }
    }
}

impl From<EnrolmentStatus> for EnrolmentStatusDb {
    fn from(status: EnrolmentStatus) -> Self {
        match status {
            EnrolmentStatus::Enabled => EnrolmentStatusDb::Enabled,
            EnrolmentStatus::Disabled => EnrolmentStatusDb::Disabled,
        }
    }
}

/// Database row mapping for the enrolment_instances table.
#[derive(Debug, Clone, FromRow)]
pub struct EnrolmentInstanceEntity {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub status: EnrolmentStatusDb,
    pub platform: Option<String>,
    pub source_id: i64,
    pub source_guid: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EnrolmentInstanceEntity> for EnrolmentInstance {
    fn from(entity: EnrolmentInstanceEntity) -> Self {
        EnrolmentInstance {
            id: entity.id,
            course_id: entity.course_id,
            name: entity.name,
            status: entity.status.into(),
            platform: entity.platform,
            source_id: entity.source_id,
            source_guid: entity.source_guid,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            EnrolmentStatus::from(EnrolmentStatusDb::Disabled),
            EnrolmentStatus::Disabled
        );
        assert_eq!(
            EnrolmentStatusDb::from(EnrolmentStatus::Enabled),
            EnrolmentStatusDb::Enabled
        );
    }
}
