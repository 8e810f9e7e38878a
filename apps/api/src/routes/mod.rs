pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::extraction::handlers::handle_upload;
use crate::lifecycle::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(health::catalog_handler))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:sid", delete(handlers::handle_end_session))
        .route(
            "/api/v1/sessions/:sid/uploads",
            post(handle_upload).layer(upload_limit),
        )
        // Records
        .route(
            "/api/v1/sessions/:sid/records",
            get(handlers::handle_list_records),
        )
        .route(
            "/api/v1/sessions/:sid/records/:id",
            get(handlers::handle_get_record).patch(handlers::handle_edit_record),
        )
        .route(
            "/api/v1/sessions/:sid/records/:id/errors",
            get(handlers::handle_completion_errors),
        )
        .route(
            "/api/v1/sessions/:sid/records/:id/complete",
            post(handlers::handle_complete_record),
        )
        // Exports
        .route(
            "/api/v1/sessions/:sid/records/:id/export/:format",
            get(handlers::handle_export_record),
        )
        .route("/api/v1/sessions/:sid/archive", get(handlers::handle_archive))
        .with_state(state)
}
