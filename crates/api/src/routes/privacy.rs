//! Privacy API routes.
//!
//! Context discovery, structured data export, and erasure endpoints over
//! the plugin tables. Export supports the right to data portability;
//! erasure supports the right to be forgotten.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use domain::services::{metadata, CollectingWriter, ExportedRecord, MetadataCollection};
use domain::models::PrivacyContext;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::{EraseSummary, PrivacyProvider};

fn provider(state: &AppState) -> PrivacyProvider {
    PrivacyProvider::new(
        state.pool.clone(),
        state.groups.clone(),
        state.config.privacy.transactional_erasure,
    )
}

/// Contexts that hold personal data for a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextListResponse {
    pub user_id: i64,
    pub contexts: Vec<PrivacyContext>,
}

/// Users holding personal data in a context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub context: PrivacyContext,
    pub user_ids: Vec<i64>,
}

/// Request body for export and per-user erasure: the approved contexts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedContextsRequest {
    #[serde(default)]
    pub contexts: Vec<PrivacyContext>,
}

/// Response for data export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub user_id: i64,
    pub record_count: u64,
    pub records: Vec<ExportedRecord>,
    pub export_timestamp: DateTime<Utc>,
}

/// Request body for batch erasure within one course.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EraseUsersRequest {
    #[validate(length(max = 500, message = "at most 500 users per batch"))]
    pub user_ids: Vec<i64>,
}

/// GET /api/v1/privacy/metadata
///
/// Declares which tables and fields hold personal data.
pub async fn get_metadata() -> Json<MetadataCollection> {
    Json(metadata())
}

/// GET /api/v1/privacy/users/:user_id/contexts
pub async fn get_contexts_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let contexts = provider(&state).contexts_for_user(user_id).await?;
    Ok(Json(ContextListResponse { user_id, contexts }))
}

/// GET /api/v1/privacy/contexts/user/:user_id/users
pub async fn get_users_in_user_context(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let context = PrivacyContext::User { id: user_id };
    let user_ids = provider(&state).users_in_context(context).await?;
    Ok(Json(UserListResponse { context, user_ids }))
}

/// GET /api/v1/privacy/contexts/course/:course_id/users
pub async fn get_users_in_course_context(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let context = PrivacyContext::Course { id: course_id };
    let user_ids = provider(&state).users_in_context(context).await?;
    Ok(Json(UserListResponse { context, user_ids }))
}

/// POST /api/v1/privacy/users/:user_id/export
///
/// Exports the user's data in each approved context as a structured tree
/// of (context, label path, record) entries.
pub async fn export_user_data(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<ApprovedContextsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let writer = CollectingWriter::new();
    let record_count = provider(&state)
        .export_user_data(user_id, &request.contexts, &writer)
        .await?;

    info!(
        user_id,
        contexts = request.contexts.len(),
        record_count,
        "Data export completed"
    );

    Ok(Json(ExportResponse {
        user_id,
        record_count,
        records: writer.records(),
        export_timestamp: Utc::now(),
    }))
}

/// POST /api/v1/privacy/contexts/course/:course_id/erase
///
/// Erases all users' plugin data in the course: disables its enrolment
/// instances, deletes their registrations and queued mail, and cleans up
/// group memberships.
pub async fn erase_course_context(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<Json<EraseSummary>, ApiError> {
    let summary = provider(&state)
        .erase_context(PrivacyContext::Course { id: course_id })
        .await?;
    Ok(Json(summary))
}

/// POST /api/v1/privacy/contexts/user/:user_id/erase
///
/// Erases the data held in a user's own context: their contact and their
/// enrolment-area queued mail.
pub async fn erase_user_context(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<EraseSummary>, ApiError> {
    let summary = provider(&state)
        .erase_context(PrivacyContext::User { id: user_id })
        .await?;
    Ok(Json(summary))
}

/// POST /api/v1/privacy/users/:user_id/erase
///
/// Erases one user's data across the approved contexts. An empty approved
/// set deletes nothing.
pub async fn erase_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<ApprovedContextsRequest>,
) -> Result<Json<EraseSummary>, ApiError> {
    let summary = provider(&state)
        .erase_for_user(user_id, &request.contexts)
        .await?;
    Ok(Json(summary))
}

/// POST /api/v1/privacy/contexts/course/:course_id/erase-users
///
/// Erases a batch of users' data within one course context.
pub async fn erase_users_in_course(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(request): Json<EraseUsersRequest>,
) -> Result<Json<EraseSummary>, ApiError> {
    request.validate()?;
    let summary = provider(&state)
        .erase_for_users(PrivacyContext::Course { id: course_id }, &request.user_ids)
        .await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_approved_contexts_request_defaults_to_empty() {
        let request: ApprovedContextsRequest = serde_json::from_str("{}").unwrap();
        assert!(request.contexts.is_empty());
    }

    #[test]
    fn test_approved_contexts_request_parses_tagged_contexts() {
        let request: ApprovedContextsRequest = serde_json::from_value(json!({
            "contexts": [
                {"kind": "user", "id": 7},
                {"kind": "course", "id": 31},
                {"kind": "other"}
            ]
        }))
        .unwrap();
        assert_eq!(
            request.contexts,
            vec![
                PrivacyContext::User { id: 7 },
                PrivacyContext::Course { id: 31 },
                PrivacyContext::Other,
            ]
        );
    }

    #[test]
    fn test_erase_users_request_batch_limit() {
        let request = EraseUsersRequest {
            user_ids: (0..501).collect(),
        };
        assert!(request.validate().is_err());

        let request = EraseUsersRequest {
            user_ids: vec![1, 2, 3],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_export_response_serialization() {
        let response = ExportResponse {
            user_id: 7,
            record_count: 0,
            records: vec![],
            export_timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"userId\":7"));
        assert!(json.contains("\"recordCount\":0"));
        assert!(json.contains("\"records\":[]"));
        assert!(json.contains("\"exportTimestamp\""));
    }

    #[test]
    fn test_user_list_response_serialization() {
        let response = UserListResponse {
            context: PrivacyContext::Course { id: 3 },
            user_ids: vec![1, 2],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"context\":{\"kind\":\"course\",\"id\":3}"));
        assert!(json.contains("\"userIds\":[1,2]"));
    }
}
