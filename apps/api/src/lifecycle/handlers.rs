//! Axum route handlers for sessions, records, exports and the bulk archive.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::archive::{build_archive, sanitize_filename, ArchiveOutcome, ARCHIVE_FILENAME};
use crate::errors::AppError;
use crate::lifecycle::registry::{RecordSummary, ResumeRecord};
use crate::lifecycle::sessions::SharedRegistry;
use crate::lifecycle::CompletionOutcome;
use crate::record::edits::{apply_all, FieldEdit};
use crate::record::FieldErrorKind;
use crate::render::{render, ExportFormat};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RecordDetailResponse {
    pub record: ResumeRecord,
    pub completion_errors: Vec<FieldErrorKind>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub edits: Vec<FieldEdit>,
}

#[derive(Debug, Serialize)]
pub struct CompletionErrorsResponse {
    pub errors: Vec<FieldErrorKind>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) async fn session(state: &AppState, sid: Uuid) -> Result<SharedRegistry, AppError> {
    state
        .sessions
        .get(sid)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {sid} not found")))
}

fn detail(record: &ResumeRecord) -> RecordDetailResponse {
    RecordDetailResponse {
        record: record.clone(),
        completion_errors: crate::record::compute_completion_errors(&record.payload),
    }
}

fn attachment(bytes: Vec<u8>, mime: &str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Sessions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreatedResponse { session_id }))
}

/// DELETE /api/v1/sessions/:sid
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.end(sid).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {sid} not found")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:sid/records
///
/// Board listing: Ready records first, then by source filename.
pub async fn handle_list_records(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<Vec<RecordSummary>>, AppError> {
    let registry = session(&state, sid).await?;
    let registry = registry.lock().await;
    Ok(Json(registry.list().iter().map(|r| r.summary()).collect()))
}

/// GET /api/v1/sessions/:sid/records/:id
pub async fn handle_get_record(
    State(state): State<AppState>,
    Path((sid, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RecordDetailResponse>, AppError> {
    let registry = session(&state, sid).await?;
    let registry = registry.lock().await;
    Ok(Json(detail(registry.get(id)?)))
}

/// PATCH /api/v1/sessions/:sid/records/:id
///
/// Applies the whole batch of edits or none of them.
pub async fn handle_edit_record(
    State(state): State<AppState>,
    Path((sid, id)): Path<(Uuid, Uuid)>,
    Json(request): Json<EditRequest>,
) -> Result<Json<RecordDetailResponse>, AppError> {
    if request.edits.is_empty() {
        return Err(AppError::Validation("edits cannot be empty".to_string()));
    }

    let registry = session(&state, sid).await?;
    let mut registry = registry.lock().await;
    let record = registry.edit(id, |fields| apply_all(&request.edits, fields))?;
    Ok(Json(detail(record)))
}

/// GET /api/v1/sessions/:sid/records/:id/errors
///
/// Live advisory validation; never changes status.
pub async fn handle_completion_errors(
    State(state): State<AppState>,
    Path((sid, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CompletionErrorsResponse>, AppError> {
    let registry = session(&state, sid).await?;
    let registry = registry.lock().await;
    Ok(Json(CompletionErrorsResponse {
        errors: registry.completion_errors(id)?,
    }))
}

/// POST /api/v1/sessions/:sid/records/:id/complete
pub async fn handle_complete_record(
    State(state): State<AppState>,
    Path((sid, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CompletionOutcome>, AppError> {
    let registry = session(&state, sid).await?;
    let mut registry = registry.lock().await;
    Ok(Json(registry.attempt_complete(id)?))
}

// ────────────────────────────────────────────────────────────────────────────
// Exports
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:sid/records/:id/export/:format
///
/// Renders a Ready record on demand. 409 when the record is not Ready.
pub async fn handle_export_record(
    State(state): State<AppState>,
    Path((sid, id, format)): Path<(Uuid, Uuid, String)>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format
        .parse()
        .map_err(|e: crate::render::UnknownFormat| AppError::Validation(e.to_string()))?;

    let registry = session(&state, sid).await?;
    let registry = registry.lock().await;
    let (record, fields) = registry.ready_fields(id)?;
    let fields = fields.clone();
    let download_name = format!(
        "{}_standardized.{}",
        sanitize_filename(&record.source_filename),
        format.extension()
    );

    let options = state.render_options.clone();
    let bytes = tokio::task::spawn_blocking(move || render(&fields, format, &options))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    info!("Exported record {id} as {format} ({} bytes)", bytes.len());
    Ok(attachment(bytes, format.mime_type(), &download_name))
}

/// GET /api/v1/sessions/:sid/archive
///
/// Bundles every Ready record in all formats. 204 when nothing is Ready.
pub async fn handle_archive(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Response, AppError> {
    let registry = session(&state, sid).await?;
    let registry = registry.lock().await;
    let ready: Vec<ResumeRecord> = registry.ready_records().into_iter().cloned().collect();

    let options = state.render_options.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let records: Vec<&ResumeRecord> = ready.iter().collect();
        build_archive(&records, &options)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in archive: {e}")))??;

    match outcome {
        ArchiveOutcome::Empty => Ok(StatusCode::NO_CONTENT.into_response()),
        ArchiveOutcome::Built { bytes, entries } => {
            info!("Session {sid}: archive built with entries [{}]", entries.join(", "));
            Ok(attachment(bytes, "application/zip", ARCHIVE_FILENAME))
        }
    }
}
