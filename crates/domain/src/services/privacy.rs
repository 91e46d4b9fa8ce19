//! Privacy collaborator interfaces and metadata.
//!
//! The privacy engine writes export records through an [`ExportWriter`] and
//! delegates group-membership cleanup to a [`GroupPrivacy`] collaborator;
//! both are injected at construction rather than reached through globals.
//! This module also declares what personal data the plugin tables hold, for
//! the privacy metadata endpoint.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

use crate::models::PrivacyContext;

/// Component name used when tagging group memberships and export subtrees.
pub const COMPONENT: &str = "enrol_arlo";

/// Root label every export path is nested under.
pub const EXPORT_ROOT: &str = "Arlo enrolment";

pub const LABEL_CONTACT: &str = "Contact";
pub const LABEL_COMMUNICATIONS: &str = "Communications";
pub const LABEL_REGISTRATION: &str = "Registration";

/// Receives one call per logical record during a privacy export.
#[async_trait::async_trait]
pub trait ExportWriter: Send + Sync {
    async fn export(&self, context: PrivacyContext, path: &[&str], record: Value);
}

/// A single record as handed to an [`ExportWriter`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedRecord {
    pub context: PrivacyContext,
    pub path: Vec<String>,
    pub data: Value,
}

/// Export writer that buffers records in memory. Used to assemble the HTTP
/// export response and as the writer in tests.
#[derive(Debug, Default)]
pub struct CollectingWriter {
    records: Mutex<Vec<ExportedRecord>>,
}

impl CollectingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn records(&self) -> Vec<ExportedRecord> {
        self.records.lock().expect("writer lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("writer lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ExportWriter for CollectingWriter {
    async fn export(&self, context: PrivacyContext, path: &[&str], record: Value) {
        let record = ExportedRecord {
            context,
            path: path.iter().map(|s| (*s).to_string()).collect(),
            data: record,
        };
        self.records.lock().expect("writer lock poisoned").push(record);
    }
}

/// Group-membership privacy collaborator.
///
/// Group rows created by this component live outside the plugin tables, so
/// erasure delegates their cleanup here instead of deleting them directly.
#[async_trait::async_trait]
pub trait GroupPrivacy: Send + Sync {
    /// Remove every membership this component created in the context.
    async fn delete_groups_for_all_users(
        &self,
        context: PrivacyContext,
        component: &str,
    ) -> Result<u64, sqlx::Error>;

    /// Remove one user's memberships across the approved contexts.
    async fn delete_groups_for_user(
        &self,
        user_id: i64,
        contexts: &[PrivacyContext],
        component: &str,
    ) -> Result<u64, sqlx::Error>;

    /// Remove a batch of users' memberships within one context.
    async fn delete_groups_for_users(
        &self,
        context: PrivacyContext,
        user_ids: &[i64],
        component: &str,
    ) -> Result<u64, sqlx::Error>;
}

/// One recorded call against [`MockGroupPrivacy`].
#[derive(Debug, Clone, PartialEq)]
pub enum GroupPrivacyCall {
    AllUsers {
        context: PrivacyContext,
        component: String,
    },
    ForUser {
        user_id: i64,
        contexts: Vec<PrivacyContext>,
        component: String,
    },
    ForUsers {
        context: PrivacyContext,
        user_ids: Vec<i64>,
        component: String,
    },
}

/// Recording fake for tests; deletes nothing.
#[derive(Debug, Default)]
pub struct MockGroupPrivacy {
    calls: Mutex<Vec<GroupPrivacyCall>>,
}

impl MockGroupPrivacy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GroupPrivacyCall> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl GroupPrivacy for MockGroupPrivacy {
    async fn delete_groups_for_all_users(
        &self,
        context: PrivacyContext,
        component: &str,
    ) -> Result<u64, sqlx::Error> {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .push(GroupPrivacyCall::AllUsers {
                context,
                component: component.to_string(),
            });
        Ok(0)
    }

    async fn delete_groups_for_user(
        &self,
        user_id: i64,
        contexts: &[PrivacyContext],
        component: &str,
    ) -> Result<u64, sqlx::Error> {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .push(GroupPrivacyCall::ForUser {
                user_id,
                contexts: contexts.to_vec(),
                component: component.to_string(),
            });
        Ok(0)
    }

    async fn delete_groups_for_users(
        &self,
        context: PrivacyContext,
        user_ids: &[i64],
        component: &str,
    ) -> Result<u64, sqlx::Error> {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .push(GroupPrivacyCall::ForUsers {
                context,
                user_ids: user_ids.to_vec(),
                component: component.to_string(),
            });
        Ok(0)
    }
}

/// Declared personal-data holdings of one plugin table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    pub name: String,
    pub summary: String,
    pub fields: Vec<FieldMetadata>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    pub name: String,
    pub summary: String,
}

/// A host subsystem this component stores personal data through.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemLink {
    pub name: String,
    pub summary: String,
}

/// The component's full privacy metadata declaration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataCollection {
    pub component: String,
    pub tables: Vec<TableMetadata>,
    pub subsystems: Vec<SubsystemLink>,
}

fn field(name: &str, summary: &str) -> FieldMetadata {
    FieldMetadata {
        name: name.to_string(),
        summary: summary.to_string(),
    }
}

/// Describes every personal-data field the plugin persists.
pub fn metadata() -> MetadataCollection {
    MetadataCollection {
        component: COMPONENT.to_string(),
        tables: vec![
            TableMetadata {
                name: "contacts".to_string(),
                summary: "Arlo person records linked to local user accounts".to_string(),
                fields: vec![
                    field("user_id", "ID of the linked user account"),
                    field("source_id", "Numeric identifier of the person on Arlo"),
                    field("source_guid", "GUID of the person on Arlo"),
                    field("first_name", "First name as held by Arlo"),
                    field("last_name", "Last name as held by Arlo"),
                    field("email", "Email address as held by Arlo"),
                    field("code_primary", "Primary reference code of the person"),
                    field("phone_work", "Work phone number"),
                    field("phone_mobile", "Mobile phone number"),
                ],
            },
            TableMetadata {
                name: "email_queue".to_string(),
                summary: "Outbound emails queued for a user".to_string(),
                fields: vec![
                    field("area", "Whether the mail is site level or enrolment level"),
                    field("instance_id", "Instance the mail belongs to"),
                    field("user_id", "Recipient user account"),
                    field("message_type", "Kind of message queued"),
                    field("status", "Delivery state"),
                    field("extra", "Payload the message is rendered from"),
                ],
            },
            TableMetadata {
                name: "registrations".to_string(),
                summary: "Event registrations synced from Arlo".to_string(),
                fields: vec![
                    field("enrol_id", "Enrolment instance the registration belongs to"),
                    field("user_id", "Registered user account"),
                    field("source_id", "Numeric identifier of the registration on Arlo"),
                    field("source_guid", "GUID of the registration on Arlo"),
                    field("grade", "Grade reported to Arlo"),
                    field("outcome", "Outcome reported to Arlo"),
                    field("last_activity", "Timestamp of the user's last course activity"),
                    field("progress_status", "Progress status reported to Arlo"),
                    field("progress_percent", "Progress percentage reported to Arlo"),
                    field("source_contact_id", "Arlo contact the registration was made for"),
                    field("source_contact_guid", "GUID of that Arlo contact"),
                ],
            },
        ],
        subsystems: vec![SubsystemLink {
            name: "group_memberships".to_string(),
            summary: "Course group memberships created during enrolment".to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_collecting_writer_buffers_records() {
        let writer = CollectingWriter::new();
        assert!(writer.is_empty());

        writer
            .export(
                PrivacyContext::User { id: 3 },
                &[EXPORT_ROOT, LABEL_CONTACT],
                json!({"email": "ada@example.com"}),
            )
            .await;
        writer
            .export(
                PrivacyContext::Course { id: 9 },
                &[EXPORT_ROOT, LABEL_REGISTRATION],
                json!({"outcome": "Pass"}),
            )
            .await;

        let records = writer.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].context, PrivacyContext::User { id: 3 });
        assert_eq!(records[0].path, vec![EXPORT_ROOT, LABEL_CONTACT]);
        assert_eq!(records[1].data, json!({"outcome": "Pass"}));
    }

    #[tokio::test]
    async fn test_mock_group_privacy_records_calls() {
        let groups = MockGroupPrivacy::new();
        let course = PrivacyContext::Course { id: 4 };

        groups
            .delete_groups_for_all_users(course, COMPONENT)
            .await
            .unwrap();
        groups
            .delete_groups_for_users(course, &[1, 2], COMPONENT)
            .await
            .unwrap();
        groups
            .delete_groups_for_user(7, &[course], COMPONENT)
            .await
            .unwrap();

        let calls = groups.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[0],
            GroupPrivacyCall::AllUsers {
                context: course,
                component: COMPONENT.to_string()
            }
        );
        assert_eq!(
            calls[1],
            GroupPrivacyCall::ForUsers {
                context: course,
                user_ids: vec![1, 2],
                component: COMPONENT.to_string()
            }
        );
        assert_eq!(
            calls[2],
            GroupPrivacyCall::ForUser {
                user_id: 7,
                contexts: vec![course],
                component: COMPONENT.to_string()
            }
        );
    }

    #[test]
    fn test_metadata_covers_all_plugin_tables() {
        let collection = metadata();
        assert_eq!(collection.component, COMPONENT);
        let names: Vec<&str> = collection.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["contacts", "email_queue", "registrations"]);
        assert_eq!(collection.subsystems.len(), 1);
    }

    #[test]
    fn test_metadata_registration_fields() {
        let collection = metadata();
        let registrations = &collection.tables[2];
        assert_eq!(registrations.fields.len(), 11);
        assert!(registrations.fields.iter().any(|f| f.name == "grade"));
        assert!(registrations
            .fields
            .iter()
            .any(|f| f.name == "source_contact_guid"));
    }
}
