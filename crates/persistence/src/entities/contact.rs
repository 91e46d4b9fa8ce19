//! Contact entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Contact;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the contacts table.
#[derive(Debug, Clone, FromRow)]
pub struct ContactEntity {
    pub id: i64,
    pub user_id: i64,
    pub source_id: i64,
    pub source_guid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub code_primary: Option<String>,
    pub phone_work: Option<String>,
    pub phone_mobile: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContactEntity> for Contact {
    fn from(entity: ContactEntity) -> Self {
        Contact {
            id: entity.id,
            user_id: entity.user_id,
            source_id: entity.source_id,
            source_guid: entity.source_guid,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            code_primary: entity.code_primary,
            phone_work: entity.phone_work,
            phone_mobile: entity.phone_mobile,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_model_keeps_all_fields() {
        let now = Utc::now();
        let entity = ContactEntity {
            id: 1,
            user_id: 2,
            source_id: 300,
            source_guid: Uuid::nil(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            code_primary: None,
            phone_work: Some("+1 555 0100".to_string()),
            phone_mobile: None,
            created_at: now,
            updated_at: now,
        };
        let model: Contact = entity.into();
        assert_eq!(model.user_id, 2);
        assert_eq!(model.email, "grace@example.com");
        assert_eq!(model.phone_work.as_deref(), Some("+1 555 0100"));
    }
}
