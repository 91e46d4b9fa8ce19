//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod contact;
pub mod email_queue;
pub mod enrolment_instance;
pub mod plugin_config;
pub mod registration;
pub mod role;

pub use contact::ContactEntity;
pub use email_queue::{EmailAreaDb, EmailQueueEntity, EmailStatusDb};
pub use enrolment_instance::{EnrolmentInstanceEntity, EnrolmentStatusDb};
pub use plugin_config::PluginConfigEntity;
pub use registration::RegistrationEntity;
pub use role::RoleEntity;
