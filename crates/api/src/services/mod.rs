//! Application services orchestrating repositories and collaborators.

pub mod privacy;
pub mod settings;

pub use privacy::{EraseSummary, PrivacyError, PrivacyProvider};
pub use settings::{InstalledDefault, SettingsService, SettingsServiceError};
