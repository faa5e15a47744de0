//! Route definitions for the `/analytics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET /keywords                    -> keywords (theme_id/category/min_uses)
/// GET /themes/performance          -> theme_performance
/// GET /themes/{id}/suggestions     -> suggestions
/// GET /summary                     -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/keywords", get(analytics::keywords))
        .route("/themes/performance", get(analytics::theme_performance))
        .route("/themes/{id}/suggestions", get(analytics::suggestions))
        .route("/summary", get(analytics::summary))
}
