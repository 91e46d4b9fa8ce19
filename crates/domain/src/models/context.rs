//! Privacy context tagged union.
//!
//! Personal data held by this plugin is always attributable either to a
//! user's own context or to a course context. Context kinds the engine does
//! not handle are carried as [`PrivacyContext::Other`] and treated as a
//! no-op by every operation, never as an error.

use serde::{Deserialize, Serialize};

/// An access scope under which personal data is grouped for export and
/// erasure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PrivacyContext {
    /// A user's personal context.
    User { id: i64 },
    /// A course context.
    Course { id: i64 },
    /// Any context kind this plugin holds no data for.
    Other,
}

impl PrivacyContext {
    /// Course id if this is a course context.
    pub fn course_id(&self) -> Option<i64> {
        match self {
            PrivacyContext::Course { id } => Some(*id),
            _ => None,
        }
    }

    /// Owning user id if this is a user context.
    pub fn user_id(&self) -> Option<i64> {
        match self {
            PrivacyContext::User { id } => Some(*id),
            _ => None,
        }
    }

    /// Collects the course ids out of an approved context list, preserving
    /// order and dropping everything that is not a course context.
    pub fn course_ids(contexts: &[PrivacyContext]) -> Vec<i64> {
        contexts.iter().filter_map(PrivacyContext::course_id).collect()
    }
}

impl std::fmt::Display for PrivacyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivacyContext::User { id } => write!(f, "user:{}", id),
            PrivacyContext::Course { id } => write!(f, "course:{}", id),
            PrivacyContext::Other => write!(f, "other"),
        }
    }
}
