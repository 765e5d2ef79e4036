//! HTTP handlers and routing.
//!
//! - [`convert_images`]: Batch convert uploads (`POST /api/convert`)
//! - [`edit_screenshot`]: Rotate/filter/export a pasted image (`POST /api/edit`)
//! - [`list_filters`]: Editor filter presets (`GET /api/filters`)
//! - [`health`]: Liveness check (`GET /api/health`)

mod convert;
mod editor;
mod meta;
pub mod response;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use crate::core::AppState;

pub use convert::convert_images;
pub use editor::edit_screenshot;
pub use meta::{health, list_filters};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().max_upload_bytes();

    Router::new()
        .route("/api/convert", post(convert_images))
        .route("/api/edit", post(edit_screenshot))
        .route("/api/filters", get(list_filters))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
