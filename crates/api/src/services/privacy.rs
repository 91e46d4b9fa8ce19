//! Privacy engine: context discovery, export, and erasure over the plugin
//! tables.
//!
//! The engine owns no ambient state: the database pool, the group privacy
//! collaborator and the export writer are all handed in. Context dispatch
//! is exhaustive; unhandled context kinds fall through as no-ops.
//!
//! Erasure entry points run their statements on one transaction when
//! `privacy.transactional_erasure` is set (the default), or independently
//! per statement when it is not. Group cleanup is a collaborator call and
//! always runs after the plugin-table statements, outside the transaction.

use std::sync::Arc;

use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use tracing::info;

use domain::models::{Contact, EmailQueueEntry, PrivacyContext, Registration};
use domain::services::{
    ExportWriter, GroupPrivacy, COMPONENT, EXPORT_ROOT, LABEL_COMMUNICATIONS, LABEL_CONTACT,
    LABEL_REGISTRATION,
};
use persistence::entities::EnrolmentInstanceEntity;
use persistence::repositories::{
    ContactRepository, EmailQueueRepository, EnrolmentInstanceRepository, RegistrationRepository,
};

/// Errors raised by privacy engine operations.
#[derive(Debug, Error)]
pub enum PrivacyError {
    #[error("storage error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("export serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Row counts of one erasure call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EraseSummary {
    pub instances_disabled: u64,
    pub contacts_deleted: u64,
    pub registrations_deleted: u64,
    pub emails_deleted: u64,
    pub group_memberships_deleted: u64,
}

/// The privacy engine.
#[derive(Clone)]
pub struct PrivacyProvider {
    pool: PgPool,
    groups: Arc<dyn GroupPrivacy>,
    transactional: bool,
    contacts: ContactRepository,
    instances: EnrolmentInstanceRepository,
    registrations: RegistrationRepository,
    emails: EmailQueueRepository,
}

impl PrivacyProvider {
    pub fn new(pool: PgPool, groups: Arc<dyn GroupPrivacy>, transactional: bool) -> Self {
        Self {
            contacts: ContactRepository::new(pool.clone()),
            instances: EnrolmentInstanceRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            emails: EmailQueueRepository::new(pool.clone()),
            pool,
            groups,
            transactional,
        }
    }

    /// The set of contexts holding personal data for a user: their own
    /// context when a contact exists, plus every course reachable through
    /// their registrations.
    pub async fn contexts_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<PrivacyContext>, PrivacyError> {
        let mut contexts = Vec::new();
        if self.contacts.find_by_user(user_id).await?.is_some() {
            contexts.push(PrivacyContext::User { id: user_id });
        }
        for course_id in self.registrations.course_ids_for_user(user_id).await? {
            contexts.push(PrivacyContext::Course { id: course_id });
        }
        Ok(contexts)
    }

    /// The users with personal data in a context.
    pub async fn users_in_context(
        &self,
        context: PrivacyContext,
    ) -> Result<Vec<i64>, PrivacyError> {
        match context {
            PrivacyContext::User { id } => {
                if self.contacts.find_by_user(id).await?.is_some() {
                    Ok(vec![id])
                } else {
                    Ok(Vec::new())
                }
            }
            PrivacyContext::Course { id } => {
                Ok(self.registrations.user_ids_in_course(id).await?)
            }
            PrivacyContext::Other => Ok(Vec::new()),
        }
    }

    /// Export the user's data for each approved context, one writer call
    /// per logical record. Returns the number of records written.
    pub async fn export_user_data(
        &self,
        user_id: i64,
        contexts: &[PrivacyContext],
        writer: &dyn ExportWriter,
    ) -> Result<u64, PrivacyError> {
        if contexts.is_empty() {
            return Ok(0);
        }
        let mut written = 0u64;
        for context in contexts {
            match *context {
                PrivacyContext::User { id } if id == user_id => {
                    if let Some(contact) = self.contacts.find_by_user(user_id).await? {
                        let data = serde_json::to_value(Contact::from(contact))?;
                        writer
                            .export(*context, &[EXPORT_ROOT, LABEL_CONTACT], data)
                            .await;
                        written += 1;
                    }
                    for email in self.emails.list_by_user(user_id).await? {
                        let data = serde_json::to_value(EmailQueueEntry::from(email))?;
                        writer
                            .export(*context, &[EXPORT_ROOT, LABEL_COMMUNICATIONS], data)
                            .await;
                        written += 1;
                    }
                }
                PrivacyContext::Course { id } => {
                    for registration in
                        self.registrations.list_for_course_and_user(id, user_id).await?
                    {
                        let data = serde_json::to_value(Registration::from(registration))?;
                        writer
                            .export(*context, &[EXPORT_ROOT, LABEL_REGISTRATION], data)
                            .await;
                        written += 1;
                    }
                }
                _ => {}
            }
        }
        info!(user_id, records = written, "Privacy export completed");
        Ok(written)
    }

    /// Erase everything attributable to one context.
    ///
    /// Course context: disable each enrolment instance, delete its
    /// registrations and its enrolment-area mail, then delegate group
    /// cleanup. User context: delete the contact and the user's
    /// enrolment-area mail.
    pub async fn erase_context(
        &self,
        context: PrivacyContext,
    ) -> Result<EraseSummary, PrivacyError> {
        let mut summary = EraseSummary::default();
        match context {
            PrivacyContext::Course { id } => {
                let instances = self.instances.list_by_course(id).await?;
                if self.transactional {
                    let mut tx = self.pool.begin().await?;
                    self.erase_course_rows(&mut *tx, &instances, &mut summary).await?;
                    tx.commit().await?;
                } else {
                    let mut conn = self.pool.acquire().await?;
                    self.erase_course_rows(&mut *conn, &instances, &mut summary).await?;
                }
                summary.group_memberships_deleted = self
                    .groups
                    .delete_groups_for_all_users(context, COMPONENT)
                    .await?;
                info!(course_id = id, ?summary, "Erased course context");
            }
            PrivacyContext::User { id } => {
                if self.transactional {
                    let mut tx = self.pool.begin().await?;
                    self.erase_user_rows(&mut *tx, id, &mut summary).await?;
                    tx.commit().await?;
                } else {
                    let mut conn = self.pool.acquire().await?;
                    self.erase_user_rows(&mut *conn, id, &mut summary).await?;
                }
                info!(user_id = id, ?summary, "Erased user context");
            }
            PrivacyContext::Other => {}
        }
        Ok(summary)
    }

    /// Erase one user's data across the approved contexts. The contact and
    /// email queue rows are deleted unconditionally once any context is
    /// approved; they are not scoped to a course.
    pub async fn erase_for_user(
        &self,
        user_id: i64,
        contexts: &[PrivacyContext],
    ) -> Result<EraseSummary, PrivacyError> {
        let mut summary = EraseSummary::default();
        if contexts.is_empty() {
            return Ok(summary);
        }
        let course_ids = PrivacyContext::course_ids(contexts);
        let enrol_ids = self.instances.ids_for_courses(&course_ids).await?;

        if self.transactional {
            let mut tx = self.pool.begin().await?;
            self.erase_user_across_rows(&mut *tx, user_id, &enrol_ids, &mut summary)
                .await?;
            tx.commit().await?;
        } else {
            let mut conn = self.pool.acquire().await?;
            self.erase_user_across_rows(&mut *conn, user_id, &enrol_ids, &mut summary)
                .await?;
        }
        summary.group_memberships_deleted = self
            .groups
            .delete_groups_for_user(user_id, contexts, COMPONENT)
            .await?;
        info!(user_id, ?summary, "Erased user data in approved contexts");
        Ok(summary)
    }

    /// Erase a batch of users' data within one course context. Other
    /// context kinds are a no-op.
    pub async fn erase_for_users(
        &self,
        context: PrivacyContext,
        user_ids: &[i64],
    ) -> Result<EraseSummary, PrivacyError> {
        let mut summary = EraseSummary::default();
        let Some(course_id) = context.course_id() else {
            return Ok(summary);
        };
        let enrol_ids = self.instances.ids_for_courses(&[course_id]).await?;

        if self.transactional {
            let mut tx = self.pool.begin().await?;
            self.erase_batch_rows(&mut *tx, &enrol_ids, user_ids, &mut summary)
                .await?;
            tx.commit().await?;
        } else {
            let mut conn = self.pool.acquire().await?;
            self.erase_batch_rows(&mut *conn, &enrol_ids, user_ids, &mut summary)
                .await?;
        }
        summary.group_memberships_deleted = self
            .groups
            .delete_groups_for_users(context, user_ids, COMPONENT)
            .await?;
        info!(course_id, users = user_ids.len(), ?summary, "Erased user batch");
        Ok(summary)
    }

    async fn erase_course_rows(
        &self,
        conn: &mut PgConnection,
        instances: &[EnrolmentInstanceEntity],
        summary: &mut EraseSummary,
    ) -> Result<(), PrivacyError> {
        for instance in instances {
            summary.instances_disabled += self.instances.disable(&mut *conn, instance.id).await?;
            summary.registrations_deleted += self
                .registrations
                .delete_by_instance(&mut *conn, instance.id)
                .await?;
            summary.emails_deleted += self
                .emails
                .delete_enrolment_area_by_instance(&mut *conn, instance.id)
                .await?;
        }
        Ok(())
    }

    async fn erase_user_rows(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
        summary: &mut EraseSummary,
    ) -> Result<(), PrivacyError> {
        summary.contacts_deleted += self.contacts.delete_by_user(&mut *conn, user_id).await?;
        summary.emails_deleted += self
            .emails
            .delete_enrolment_area_by_user(&mut *conn, user_id)
            .await?;
        Ok(())
    }

    async fn erase_user_across_rows(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
        enrol_ids: &[i64],
        summary: &mut EraseSummary,
    ) -> Result<(), PrivacyError> {
        summary.registrations_deleted += self
            .registrations
            .delete_by_instances_and_user(&mut *conn, enrol_ids, user_id)
            .await?;
        summary.contacts_deleted += self.contacts.delete_by_user(&mut *conn, user_id).await?;
        summary.emails_deleted += self.emails.delete_by_user(&mut *conn, user_id).await?;
        Ok(())
    }

    async fn erase_batch_rows(
        &self,
        conn: &mut PgConnection,
        enrol_ids: &[i64],
        user_ids: &[i64],
        summary: &mut EraseSummary,
    ) -> Result<(), PrivacyError> {
        summary.registrations_deleted += self
            .registrations
            .delete_by_instances_and_users(&mut *conn, enrol_ids, user_ids)
            .await?;
        summary.emails_deleted += self
            .emails
            .delete_enrolment_area_by_instances_and_users(&mut *conn, enrol_ids, user_ids)
            .await?;
        Ok(())
    }
}
