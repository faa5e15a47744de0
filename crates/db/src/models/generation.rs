//! Generation batch entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use textures_core::types::{DbId, Timestamp};

/// A row from the `generations` table. Immutable after insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Generation {
    pub id: DbId,
    pub theme_id: DbId,
    pub session_name: Option<String>,
    pub base_prompt: String,
    pub variation_params: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for creating a generation batch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGeneration {
    pub theme_id: DbId,
    pub session_name: Option<String>,
    pub base_prompt: String,
    pub variation_params: Option<serde_json::Value>,
}

/// Completion counters for one generation batch, computed in SQL.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationProgress {
    pub generation_id: DbId,
    pub requested: i64,
    pub completed: i64,
    pub rated: i64,
}
