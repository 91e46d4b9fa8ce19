//! Domain models for the Arlo enrolment sync backend.

pub mod contact;
pub mod context;
pub mod email_queue;
pub mod enrolment;
pub mod registration;

pub use contact::Contact;
pub use context::PrivacyContext;
pub use email_queue::{EmailArea, EmailQueueEntry, EmailStatus};
pub use enrolment::{EnrolmentInstance, EnrolmentStatus};
pub use registration::Registration;
