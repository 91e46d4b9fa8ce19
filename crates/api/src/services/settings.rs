//! Plugin settings service.
//!
//! Wraps the key/value config store with the typed setting table: values
//! are validated against their declared type, and `install_defaults`
//! persists every resolvable default in declaration order. The deferred
//! `roleid` default is resolved once per install run through the role
//! lookup; a platform without a student-archetype role makes the install
//! fail outright.

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use domain::services::settings::{
    definition, definitions, validate_value, DeferredDefault, SettingDefault, SettingsError,
};
use persistence::entities::PluginConfigEntity;
use persistence::repositories::{PluginConfigRepository, RoleRepository};

/// Archetype the deferred roleid default resolves against.
const STUDENT_ARCHETYPE: &str = "student";

/// Errors raised by settings service operations.
#[derive(Debug, Error)]
pub enum SettingsServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("storage error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One default written by `install_defaults`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledDefault {
    pub name: String,
    pub value: serde_json::Value,
}

/// Service over the plugin_config store.
#[derive(Clone)]
pub struct SettingsService {
    config: PluginConfigRepository,
    roles: RoleRepository,
}

impl SettingsService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            config: PluginConfigRepository::new(pool.clone()),
            roles: RoleRepository::new(pool),
        }
    }

    /// Persist every defined setting with a resolvable default, in
    /// declaration order. Settings without a default are skipped; existing
    /// values are overwritten, so re-running is idempotent.
    pub async fn install_defaults(&self) -> Result<Vec<InstalledDefault>, SettingsServiceError> {
        let mut installed = Vec::new();
        for def in definitions() {
            let value = match def.default {
                SettingDefault::None => continue,
                SettingDefault::Static(value) => value,
                SettingDefault::Deferred(DeferredDefault::StudentRoleId) => {
                    let role_id = self
                        .roles
                        .first_id_by_archetype(STUDENT_ARCHETYPE)
                        .await?
                        .ok_or(SettingsError::MissingStudentArchetype)?;
                    serde_json::json!(role_id)
                }
            };
            self.config.upsert(def.name, value.clone()).await?;
            info!(name = def.name, "Installed setting default");
            installed.push(InstalledDefault {
                name: def.name.to_string(),
                value,
            });
        }
        Ok(installed)
    }

    /// Every persisted setting.
    pub async fn list(&self) -> Result<Vec<PluginConfigEntity>, SettingsServiceError> {
        Ok(self.config.list().await?)
    }

    /// One persisted setting. Unknown names are rejected before the store
    /// is consulted.
    pub async fn get(&self, name: &str) -> Result<Option<PluginConfigEntity>, SettingsServiceError> {
        let _ = definition(name).ok_or_else(|| SettingsError::UnknownSetting(name.to_string()))?;
        Ok(self.config.get(name).await?)
    }

    /// Write a setting after validating the value against its declared
    /// type.
    pub async fn set(
        &self,
        name: &str,
        value: serde_json::Value,
    ) -> Result<PluginConfigEntity, SettingsServiceError> {
        let def = definition(name).ok_or_else(|| SettingsError::UnknownSetting(name.to_string()))?;
        validate_value(&def, &value)?;
        let entity = self.config.upsert(name, value).await?;
        info!(name, "Updated setting");
        Ok(entity)
    }
}
