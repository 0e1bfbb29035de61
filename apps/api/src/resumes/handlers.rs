//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use resume::export::{export_file_name, render_markdown};
use resume::validation::{validate, Mode};
use resume::{ResumeDocument, ResumePatch};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/resumes/:user_id
///
/// Returns the user's documents. An empty array means no resume yet.
pub async fn handle_get_resumes(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<Vec<ResumeDocument>>>, AppError> {
    auth.ensure_owner(&user_id)?;

    let documents = state.store.find_by_user(&user_id).await?;

    Ok(Json(DataResponse {
        data: documents.into_iter().collect(),
    }))
}

/// POST /api/resumes
///
/// Creates the user's document seeded with the supplied sections.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<DataResponse<ResumeDocument>>), AppError> {
    check_body_user(&auth, &body)?;
    let patch = validated_patch(body, Mode::Create)?;

    let document = state.store.create(auth.user_id(), patch).await?;
    info!("Resume created for user {}", auth.user_id());

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// PUT /api/resumes/:user_id
///
/// Merges the supplied sections into the existing document.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<DataResponse<ResumeDocument>>, AppError> {
    auth.ensure_owner(&user_id)?;
    check_body_user(&auth, &body)?;
    let patch = validated_patch(body, Mode::Update)?;

    let document = state.store.update(&user_id, patch).await?;

    Ok(Json(DataResponse { data: document }))
}

/// DELETE /api/resumes/:user_id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.ensure_owner(&user_id)?;

    state.store.delete(&user_id).await?;
    info!("Resume deleted for user {user_id}");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/resumes/:user_id/export
///
/// Renders the stored document as a downloadable markdown file.
pub async fn handle_export_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth.ensure_owner(&user_id)?;

    let document = state
        .store
        .find_by_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No resume found for user {user_id}")))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(&document.draft.basic_info)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_markdown(&document.draft),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// A `userId` in the body, when present, must name the caller.
fn check_body_user(auth: &AuthUser, body: &Value) -> Result<(), AppError> {
    match body.get("userId") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(id)) => auth.ensure_owner(id),
        Some(_) => Err(AppError::BadRequest("userId must be a string".to_string())),
    }
}

/// Runs the validation gate, then decodes the body into a section patch.
fn validated_patch(body: Value, mode: Mode) -> Result<ResumePatch, AppError> {
    validate(&body, mode).map_err(AppError::Validation)?;
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("Invalid body: {e}")))
}
