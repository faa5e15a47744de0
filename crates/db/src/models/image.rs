//! Generated image entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use textures_core::types::{DbId, Timestamp};

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub generation_id: DbId,
    pub filename: String,
    /// Path relative to the configured images directory.
    pub file_path: String,
    pub prompt: String,
    pub keywords: Vec<String>,
    /// Absent until a human rates the image. Re-rating overwrites.
    pub rating: Option<i32>,
    pub variation_params: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for recording a stored image.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImage {
    pub generation_id: DbId,
    pub filename: String,
    pub file_path: String,
    pub prompt: String,
    pub keywords: Vec<String>,
    pub variation_params: Option<serde_json::Value>,
}

/// Corpus-wide counters, computed in SQL.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GlobalStats {
    pub total_themes: i64,
    pub total_generations: i64,
    pub total_images: i64,
    pub rated_images: i64,
    pub average_rating: Option<f64>,
}
