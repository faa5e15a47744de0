//! Route definitions for the `/generate` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Routes mounted at `/generate`.
///
/// ```text
/// POST   /                          -> generate
/// GET    /status/{generation_id}    -> status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(generation::generate))
        .route("/status/{generation_id}", get(generation::status))
}
