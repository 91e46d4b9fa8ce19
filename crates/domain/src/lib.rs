//! Domain layer for the Arlo enrolment sync backend.
//!
//! This crate contains:
//! - Domain models (Contact, Registration, EmailQueueEntry, EnrolmentInstance)
//! - The privacy context tagged union
//! - Plugin setting definitions and the privacy collaborator traits

pub mod models;
pub mod services;
