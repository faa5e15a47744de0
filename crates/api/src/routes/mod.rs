pub mod analytics;
pub mod generation;
pub mod health;
pub mod images;
pub mod themes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /themes                                  list, create
/// /themes/{id}                             get, update, delete
/// /themes/{id}/branch                      branch into a child theme (POST)
/// /themes/{id}/lineage                     ancestors and children
/// /themes/{id}/statistics                  aggregate counters
/// /themes/{id}/images                      images across all generations
///
/// /images                                  list (limit/offset/min_rating)
/// /images/recent                           most recent images
/// /images/{id}                             get, delete
/// /images/{id}/rate                        set rating (POST)
///
/// /generate                                run a generation batch (POST)
/// /generate/status/{generation_id}         batch progress
///
/// /analytics/keywords                      keyword effectiveness
/// /analytics/themes/performance            per-theme performance
/// /analytics/themes/{id}/suggestions       prompt improvement suggestions
/// /analytics/summary                       corpus-wide counters
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/themes", themes::router())
        .nest("/images", images::router())
        .nest("/generate", generation::router())
        .nest("/analytics", analytics::router())
}
