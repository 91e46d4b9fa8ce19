//! Plugin settings API routes.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use persistence::entities::PluginConfigEntity;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::{InstalledDefault, SettingsService};

/// One persisted setting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingResponse {
    pub name: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl From<PluginConfigEntity> for SettingResponse {
    fn from(entity: PluginConfigEntity) -> Self {
        SettingResponse {
            name: entity.name,
            value: entity.value,
            updated_at: entity.updated_at,
        }
    }
}

/// Response for listing persisted settings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsListResponse {
    pub settings: Vec<SettingResponse>,
}

/// Request to write one setting.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingRequest {
    pub value: serde_json::Value,
}

/// Response for installing defaults.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallDefaultsResponse {
    pub installed: Vec<InstalledDefault>,
    pub count: usize,
}

/// GET /api/v1/settings
pub async fn list_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SettingsService::new(state.pool.clone());
    let settings = service.list().await?;
    Ok(Json(SettingsListResponse {
        settings: settings.into_iter().map(SettingResponse::from).collect(),
    }))
}

/// GET /api/v1/settings/:name
pub async fn get_setting(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SettingsService::new(state.pool.clone());
    let entity = service
        .get(&name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Setting not set: {}", name)))?;
    Ok(Json(SettingResponse::from(entity)))
}

/// PUT /api/v1/settings/:name
pub async fn update_setting(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<UpdateSettingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SettingsService::new(state.pool.clone());
    let entity = service.set(&name, request.value).await?;
    Ok(Json(SettingResponse::from(entity)))
}

/// POST /api/v1/settings/install-defaults
///
/// Persists every defined default into the store, resolving the student
/// role id on the way. Re-running overwrites with the same values.
pub async fn install_defaults(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SettingsService::new(state.pool.clone());
    let installed = service.install_defaults().await?;
    let count = installed.len();
    Ok(Json(InstallDefaultsResponse { installed, count }))
}
