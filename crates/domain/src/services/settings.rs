//! Plugin setting definitions.
//!
//! Every configurable property of the sync plugin is declared here with its
//! type and default. Defaults come in three shapes: absent, a static value,
//! or a deferred computation resolved once when defaults are installed into
//! the backing store. The only deferred computation today looks up the
//! platform's default student role.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Action taken when the external platform reports a registration removed.
pub const EXTERNAL_REMOVED_KEEP: i64 = 0;
pub const EXTERNAL_REMOVED_SUSPEND: i64 = 1;
pub const EXTERNAL_REMOVED_SUSPEND_NO_ROLES: i64 = 2;
pub const EXTERNAL_REMOVED_UNENROL: i64 = 3;

/// Value type of a plugin setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    /// Unfiltered string, stored verbatim (credentials, URLs).
    Raw,
    /// 64-bit integer.
    Int,
    /// Plain text string.
    Text,
}

impl std::fmt::Display for SettingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingType::Raw => write!(f, "raw"),
            SettingType::Int => write!(f, "int"),
            SettingType::Text => write!(f, "text"),
        }
    }
}

/// A default computation that can only run against live platform state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredDefault {
    /// First role carrying the `student` archetype.
    StudentRoleId,
}

/// Default for a setting: absent, static, or deferred.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingDefault {
    None,
    Static(Value),
    Deferred(DeferredDefault),
}

/// A single plugin setting declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDefinition {
    pub name: &'static str,
    pub data_type: SettingType,
    pub default: SettingDefault,
}

impl SettingDefinition {
    const fn new(name: &'static str, data_type: SettingType, default: SettingDefault) -> Self {
        Self {
            name,
            data_type,
            default,
        }
    }
}

/// Errors raised by setting definition and default resolution.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("invalid value for setting {name}: expected {expected}")]
    InvalidValue {
        name: String,
        expected: SettingType,
    },

    #[error("no role with the student archetype exists")]
    MissingStudentArchetype,
}

/// The full setting table, in declaration order. Install iterates this
/// order when persisting defaults.
pub fn definitions() -> Vec<SettingDefinition> {
    use SettingDefault::{Deferred, None, Static};
    use SettingType::{Int, Raw, Text};

    vec![
        SettingDefinition::new("platform", Raw, None),
        SettingDefinition::new("apiusername", Raw, None),
        SettingDefinition::new("apipassword", Raw, None),
        SettingDefinition::new("apistatus", Int, Static(json!(-1))),
        SettingDefinition::new("apierrormessage", Text, Static(json!(""))),
        SettingDefinition::new("apierrortime", Int, Static(json!(0))),
        SettingDefinition::new("apierrorcounter", Int, Static(json!(0))),
        SettingDefinition::new("matchuseraccountsby", Int, None),
        SettingDefinition::new("authplugin", Text, Static(json!("manual"))),
        SettingDefinition::new("roleid", Int, Deferred(DeferredDefault::StudentRoleId)),
        SettingDefinition::new(
            "unenrolaction",
            Int,
            Static(json!(EXTERNAL_REMOVED_UNENROL)),
        ),
        SettingDefinition::new(
            "expiredaction",
            Int,
            Static(json!(EXTERNAL_REMOVED_SUSPEND)),
        ),
        SettingDefinition::new("pushonlineactivityresults", Int, Static(json!(1))),
        SettingDefinition::new("pusheventresults", Int, Static(json!(1))),
        SettingDefinition::new("alertsiteadmins", Int, Static(json!(1))),
        SettingDefinition::new("sendnewaccountdetailsemail", Int, Static(json!(1))),
        SettingDefinition::new("sendemailimmediately", Int, Static(json!(1))),
        SettingDefinition::new("emailprocessingviacli", Int, Static(json!(0))),
    ]
}

/// Look up a single definition by name.
pub fn definition(name: &str) -> Option<SettingDefinition> {
    definitions().into_iter().find(|d| d.name == name)
}

/// Check a candidate value against a definition's declared type.
pub fn validate_value(definition: &SettingDefinition, value: &Value) -> Result<(), SettingsError> {
    let ok = match definition.data_type {
        SettingType::Raw | SettingType::Text => value.is_string(),
        SettingType::Int => value.is_i64(),
    };
    if ok {
        Ok(())
    } else {
        Err(SettingsError::InvalidValue {
            name: definition.name.to_string(),
            expected: definition.data_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_is_stable() {
        let names: Vec<&str> = definitions().iter().map(|d| d.name).collect();
        assert_eq!(names[0], "platform");
        assert_eq!(names[3], "apistatus");
        assert_eq!(names[9], "roleid");
        assert_eq!(*names.last().unwrap(), "emailprocessingviacli");
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn test_credentials_have_no_default() {
        for name in ["platform", "apiusername", "apipassword", "matchuseraccountsby"] {
            let def = definition(name).unwrap();
            assert_eq!(def.default, SettingDefault::None, "{}", name);
        }
    }

    #[test]
    fn test_roleid_default_is_deferred() {
        let def = definition("roleid").unwrap();
        assert_eq!(
            def.default,
            SettingDefault::Deferred(DeferredDefault::StudentRoleId)
        );
        assert_eq!(def.data_type, SettingType::Int);
    }

    #[test]
    fn test_action_defaults() {
        assert_eq!(
            definition("unenrolaction").unwrap().default,
            SettingDefault::Static(json!(EXTERNAL_REMOVED_UNENROL))
        );
        assert_eq!(
            definition("expiredaction").unwrap().default,
            SettingDefault::Static(json!(EXTERNAL_REMOVED_SUSPEND))
        );
    }

    #[test]
    fn test_unknown_definition() {
        assert!(definition("nonexistent").is_none());
    }

    #[test]
    fn test_validate_value_int() {
        let def = definition("apistatus").unwrap();
        assert!(validate_value(&def, &json!(200)).is_ok());
        assert!(validate_value(&def, &json!("200")).is_err());
        assert!(validate_value(&def, &json!(1.5)).is_err());
    }

    #[test]
    fn test_validate_value_string() {
        let def = definition("authplugin").unwrap();
        assert!(validate_value(&def, &json!("oauth2")).is_ok());
        assert!(validate_value(&def, &json!(3)).is_err());
    }

    #[test]
    fn test_invalid_value_error_message() {
        let def = definition("apistatus").unwrap();
        let err = validate_value(&def, &json!("nope")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for setting apistatus: expected int"
        );
    }

    #[test]
    fn test_setting_type_display() {
        assert_eq!(SettingType::Raw.to_string(), "raw");
        assert_eq!(SettingType::Int.to_string(), "int");
        assert_eq!(SettingType::Text.to_string(), "text");
    }
}
