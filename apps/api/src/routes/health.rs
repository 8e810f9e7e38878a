use axum::Json;
use serde_json::{json, Value};

use crate::record::schema::{CompensationType, Language, MaritalStatus};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "standardizer"
    }))
}

/// GET /api/v1/catalog
/// Values accepted by the enumerated fields. The unset sentinel is not listed.
pub async fn catalog_handler() -> Json<Value> {
    let languages: Vec<&str> = Language::CATALOG.iter().map(|l| l.as_str()).collect();
    let marital_statuses: Vec<&str> = MaritalStatus::ALL
        .iter()
        .filter(|s| **s != MaritalStatus::Unset)
        .map(|s| s.as_str())
        .collect();
    let compensation_types: Vec<&str> = CompensationType::ALL
        .iter()
        .filter(|c| **c != CompensationType::Unset)
        .map(|c| c.as_str())
        .collect();

    Json(json!({
        "languages": languages,
        "marital_statuses": marital_statuses,
        "compensation_types": compensation_types
    }))
}
