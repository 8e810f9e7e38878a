use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::ingest::{ingest_batch, IngestReport, UploadedFile};
use crate::lifecycle::handlers::session;
use crate::state::AppState;

/// POST /api/v1/sessions/:sid/uploads
///
/// Accepts one or more file parts. Every part carrying a filename is ingested in order;
/// non-file parts are ignored. Capacity and duplicate rejections are listed under
/// `skipped` rather than failing the request.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<IngestReport>, AppError> {
    let registry = session(&state, sid).await?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload '{filename}': {e}")))?;
        files.push(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    if files.is_empty() {
        return Err(AppError::Validation(
            "request contains no file parts".to_string(),
        ));
    }

    let mut registry = registry.lock().await;
    let report = ingest_batch(
        &mut registry,
        files,
        state.text_extractor.clone(),
        state.extractor.as_ref(),
    )
    .await;
    Ok(Json(report))
}
