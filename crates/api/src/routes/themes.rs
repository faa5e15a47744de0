//! Route definitions for the `/themes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::themes;
use crate::state::AppState;

/// Routes mounted at `/themes`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
/// POST   /{id}/branch         -> branch
/// GET    /{id}/lineage        -> lineage
/// GET    /{id}/statistics     -> statistics
/// GET    /{id}/images         -> images
/// GET    /{id}/generations    -> generations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(themes::list).post(themes::create))
        .route(
            "/{id}",
            get(themes::get_by_id)
                .put(themes::update)
                .delete(themes::delete),
        )
        .route("/{id}/branch", post(themes::branch))
        .route("/{id}/lineage", get(themes::lineage))
        .route("/{id}/statistics", get(themes::statistics))
        .route("/{id}/images", get(themes::images))
        .route("/{id}/generations", get(themes::generations))
}
