//! Domain services for the Arlo enrolment sync backend.
//!
//! Services contain business logic that operates on domain models.

pub mod privacy;
pub mod settings;

pub use privacy::{
    metadata, CollectingWriter, ExportWriter, ExportedRecord, FieldMetadata, GroupPrivacy,
    GroupPrivacyCall, MetadataCollection, MockGroupPrivacy, SubsystemLink, TableMetadata,
    COMPONENT, EXPORT_ROOT, LABEL_COMMUNICATIONS, LABEL_CONTACT, LABEL_REGISTRATION,
};

pub use settings::{
    definition, definitions, validate_value, DeferredDefault, SettingDefault, SettingDefinition,
    SettingType, SettingsError, EXTERNAL_REMOVED_KEEP, EXTERNAL_REMOVED_SUSPEND,
    EXTERNAL_REMOVED_SUSPEND_NO_ROLES, EXTERNAL_REMOVED_UNENROL,
};
