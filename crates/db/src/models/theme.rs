//! Theme entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use textures_core::types::{DbId, Timestamp};

/// A row from the `themes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Theme {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub base_prompt: String,
    /// Set for branched themes; `None` for roots.
    pub parent_theme_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// DTO for creating a theme.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTheme {
    pub name: String,
    pub description: Option<String>,
    pub base_prompt: String,
    pub parent_theme_id: Option<DbId>,
}

/// DTO for updating a theme.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTheme {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_prompt: Option<String>,
}

/// Aggregate counters for one theme, computed in SQL.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThemeStatistics {
    pub theme_id: DbId,
    pub generation_count: i64,
    pub image_count: i64,
    pub rated_count: i64,
    pub average_rating: Option<f64>,
    pub child_count: i64,
}
