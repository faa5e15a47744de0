//! Handlers for the `/images` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use textures_core::error::CoreError;
use textures_core::policy::{DEFAULT_LIMIT, DEFAULT_RECENT_LIMIT};
use textures_core::types::DbId;
use textures_core::validation::validate_rating;
use textures_db::models::image::Image;
use textures_db::repositories::ImageRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /images`.
#[derive(Debug, Deserialize)]
pub struct ListImagesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub min_rating: Option<i32>,
}

/// GET /api/v1/images
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListImagesQuery>,
) -> AppResult<Json<Vec<Image>>> {
    if let Some(min_rating) = query.min_rating {
        validate_rating(min_rating)?;
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 1000);
    let offset = query.offset.unwrap_or(0).max(0);

    let images = ImageRepo::list(&state.pool, limit, offset, query.min_rating).await?;
    Ok(Json(images))
}

/// Query parameters for `GET /images/recent`.
#[derive(Debug, Deserialize)]
pub struct RecentImagesQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/images/recent
pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentImagesQuery>,
) -> AppResult<Json<Vec<Image>>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, 1000);
    let images = ImageRepo::recent(&state.pool, limit).await?;
    Ok(Json(images))
}

/// GET /api/v1/images/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Image>> {
    let image = ImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Image", id }))?;
    Ok(Json(image))
}

/// Request body for rating an image.
#[derive(Debug, Deserialize)]
pub struct RateImage {
    pub rating: i32,
}

/// POST /api/v1/images/{id}/rate
///
/// Set or overwrite the image's rating; the latest write wins.
pub async fn rate(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RateImage>,
) -> AppResult<Json<Image>> {
    validate_rating(input.rating)?;

    let image = ImageRepo::set_rating(&state.pool, id, input.rating)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Image", id }))?;
    Ok(Json(image))
}

/// DELETE /api/v1/images/{id}
///
/// Removes the database row and the stored file. A missing file is
/// logged, not fatal.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let image = ImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Image", id }))?;

    ImageRepo::delete(&state.pool, id).await?;

    let path = state.config.images_dir.join(&image.file_path);
    if let Err(err) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %err, "failed to remove image file");
    }

    Ok(StatusCode::NO_CONTENT)
}
