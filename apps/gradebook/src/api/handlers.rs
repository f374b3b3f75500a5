//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers. Each handler
//! makes exactly one store call.

use super::{
    AppState,
    error::ApiError,
    types::{HealthResponse, ListParams, MessageResponse, StatsResponse, StudentJson, StudentRequest},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use gradebook_core::{GradebookError, RecordId, SortKey, SortOrder, export_attachment, sort_records};

// =============================================================================
// EXTRACTION HELPERS
// =============================================================================

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

fn invalid_id(rejection: PathRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid student ID: {}", rejection.body_text()))
}

fn not_found(id: u64) -> ApiError {
    ApiError::from(GradebookError::NotFound(RecordId(id)))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CREATE HANDLER
// =============================================================================

/// Add a student.
pub async fn create_student_handler(
    State(state): State<AppState>,
    body: Result<Json<StudentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;
    let draft = request
        .into_draft()
        .ok_or_else(|| ApiError::BadRequest("Name and marks are required".to_string()))?;

    let id = state.store.insert(&draft)?;
    tracing::debug!(id = id.0, "Student added");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Student added successfully")),
    ))
}

// =============================================================================
// LIST HANDLER
// =============================================================================

/// List every student, in store order unless `sort_by` is given.
pub async fn list_students_handler(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<StudentJson>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let order = params
        .order
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()?
        .unwrap_or_default();
    let key = params
        .sort_by
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()?;

    let mut records = state.store.list_all()?;
    if let Some(key) = key {
        sort_records(&mut records, key, order);
    }

    Ok(Json(records.into_iter().map(StudentJson::from).collect()))
}

// =============================================================================
// STATS HANDLER
// =============================================================================

/// Pass/fail counts and extrema over every student.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let marks = state.store.marks()?;
    Ok(Json(StatsResponse::from(state.stats.compute(&marks))))
}

// =============================================================================
// DOWNLOAD HANDLER
// =============================================================================

/// Download every student as a CSV attachment, highest marks first.
pub async fn download_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.list_all()?;
    let export = export_attachment(&records)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (header::CONTENT_DISPOSITION, export.content_disposition()),
        ],
        export.data,
    ))
}

// =============================================================================
// UPDATE HANDLER
// =============================================================================

/// Replace name and marks of a student.
pub async fn update_student_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<StudentRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id.map_err(invalid_id)?;
    let Json(request) = body.map_err(invalid_body)?;
    let draft = request.into_draft().ok_or_else(|| {
        ApiError::BadRequest("Name and marks are required for update".to_string())
    })?;

    if !state.store.update(RecordId(id), &draft)? {
        return Err(not_found(id));
    }
    tracing::debug!(id, "Student updated");

    Ok(Json(MessageResponse::new(format!(
        "Student ID {} updated successfully",
        id
    ))))
}

// =============================================================================
// DELETE HANDLER
// =============================================================================

/// Delete a student.
pub async fn delete_student_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id.map_err(invalid_id)?;

    if !state.store.delete(RecordId(id))? {
        return Err(not_found(id));
    }
    tracing::debug!(id, "Student deleted");

    Ok(Json(MessageResponse::new(format!(
        "Student ID {} deleted successfully",
        id
    ))))
}
