//! Repository implementations for database operations.

pub mod contact;
pub mod email_queue;
pub mod enrolment_instance;
pub mod group_membership;
pub mod plugin_config;
pub mod registration;
pub mod role;

pub use contact::{ContactRepository, CreateContactInput};
pub use email_queue::{EmailQueueRepository, EnqueueEmailInput};
pub use enrolment_instance::{CreateEnrolmentInstanceInput, EnrolmentInstanceRepository};
pub use group_membership::{GroupMembershipRepository, PgGroupPrivacy};
pub use plugin_config::PluginConfigRepository;
pub use registration::{CreateRegistrationInput, RegistrationRepository};
pub use role::RoleRepository;
