//! Route definitions for the `/images` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// GET    /              -> list (limit/offset/min_rating)
/// GET    /recent        -> recent
/// GET    /{id}          -> get_by_id
/// DELETE /{id}          -> delete
/// POST   /{id}/rate     -> rate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(images::list))
        .route("/recent", get(images::recent))
        .route("/{id}", get(images::get_by_id).delete(images::delete))
        .route("/{id}/rate", post(images::rate))
}
