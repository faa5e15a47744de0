//! Handlers for the `/themes` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use textures_core::error::CoreError;
use textures_core::types::DbId;
use textures_db::models::generation::Generation;
use textures_db::models::image::Image;
use textures_db::models::theme::{CreateTheme, Theme, ThemeStatistics, UpdateTheme};
use textures_db::repositories::{GenerationRepo, ImageRepo, ThemeRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/themes
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTheme>,
) -> AppResult<(StatusCode, Json<Theme>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Theme name must not be empty".into()));
    }
    if let Some(parent_id) = input.parent_theme_id {
        ensure_theme_exists(&state, parent_id).await?;
    }

    let theme = ThemeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(theme)))
}

/// GET /api/v1/themes
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Theme>>> {
    let themes = ThemeRepo::list_all(&state.pool).await?;
    Ok(Json(themes))
}

/// GET /api/v1/themes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Theme>> {
    let theme = ensure_theme_exists(&state, id).await?;
    Ok(Json(theme))
}

/// PUT /api/v1/themes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTheme>,
) -> AppResult<Json<Theme>> {
    let theme = ThemeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Theme", id }))?;
    Ok(Json(theme))
}

/// DELETE /api/v1/themes/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ThemeRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Theme", id }))
    }
}

/// Request body for branching a theme.
#[derive(Debug, Deserialize)]
pub struct BranchTheme {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to the parent's base prompt when omitted.
    pub base_prompt: Option<String>,
}

/// POST /api/v1/themes/{id}/branch
///
/// Create a child theme that inherits the parent's base prompt unless a
/// new one is supplied.
pub async fn branch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<BranchTheme>,
) -> AppResult<(StatusCode, Json<Theme>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Theme name must not be empty".into()));
    }
    let parent = ensure_theme_exists(&state, id).await?;

    let child = ThemeRepo::create(
        &state.pool,
        &CreateTheme {
            name: input.name,
            description: input.description,
            base_prompt: input.base_prompt.unwrap_or(parent.base_prompt),
            parent_theme_id: Some(parent.id),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(child)))
}

/// Lineage of one theme: its ancestors up to the root and its direct
/// children.
#[derive(Debug, Serialize)]
pub struct ThemeLineage {
    pub theme: Theme,
    /// Nearest ancestor first, root last.
    pub ancestors: Vec<Theme>,
    pub children: Vec<Theme>,
}

/// GET /api/v1/themes/{id}/lineage
pub async fn lineage(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ThemeLineage>> {
    let theme = ensure_theme_exists(&state, id).await?;

    let mut ancestors = Vec::new();
    let mut cursor = theme.parent_theme_id;
    while let Some(parent_id) = cursor {
        match ThemeRepo::find_by_id(&state.pool, parent_id).await? {
            Some(parent) => {
                cursor = parent.parent_theme_id;
                ancestors.push(parent);
            }
            // Dangling parent reference; stop walking.
            None => break,
        }
    }

    let children = ThemeRepo::children(&state.pool, id).await?;

    Ok(Json(ThemeLineage {
        theme,
        ancestors,
        children,
    }))
}

/// GET /api/v1/themes/{id}/statistics
pub async fn statistics(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ThemeStatistics>> {
    let stats = ThemeRepo::statistics(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Theme", id }))?;
    Ok(Json(stats))
}

/// GET /api/v1/themes/{id}/images
pub async fn images(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Image>>> {
    ensure_theme_exists(&state, id).await?;
    let images = ImageRepo::list_for_theme(&state.pool, id).await?;
    Ok(Json(images))
}

/// GET /api/v1/themes/{id}/generations
pub async fn generations(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Generation>>> {
    ensure_theme_exists(&state, id).await?;
    let generations = GenerationRepo::list_for_theme(&state.pool, id).await?;
    Ok(Json(generations))
}

/// Load a theme or fail with a 404.
pub(crate) async fn ensure_theme_exists(state: &AppState, id: DbId) -> AppResult<Theme> {
    ThemeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Theme", id }))
}
