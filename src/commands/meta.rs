//! Small read-only endpoints.

use axum::Json;
use serde_json::{Value, json};

use crate::processing::{FILTER_PRESETS, FilterPreset};

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/filters`: the editor's filter presets.
pub async fn list_filters() -> Json<Vec<FilterPreset>> {
    Json(FILTER_PRESETS.to_vec())
}
