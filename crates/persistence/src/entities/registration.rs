//! Registration entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Registration;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the registrations table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
    pub id: i64,
    pub enrol_id: i64,
    pub user_id: i64,
    pub source_id: i64,
    pub source_guid: Uuid,
    pub grade: Option<String>,
    pub outcome: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
    pub progress_status: Option<String>,
    pub progress_percent: Option<f64>,
    pub source_contact_id: Option<i64>,
    pub source_contact_guid: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RegistrationEntity> for Registration {
    fn from(entity: RegistrationEntity) -> Self {
        Registration {
            id: entity.id,
            enrol_id: entity.enrol_id,
            user_id: entity.user_id,
            source_id: entity.source_id,
            source_guid: entity.source_guid,
            grade: entity.grade,
            outcome: entity.outcome,
            last_activity: entity.last_activity,
            progress_status: entity.progress_status,
            progress_percent: entity.progress_percent,
            source_contact_id: entity.source_contact_id,
            source_contact_guid: entity.source_contact_guid,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
