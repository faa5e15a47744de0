//! Repository for the `generations` table.

use sqlx::PgPool;
use textures_core::types::DbId;

use crate::models::generation::{CreateGeneration, Generation, GenerationProgress};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, theme_id, session_name, base_prompt, variation_params, created_at";

/// Provides operations for generation batches.
pub struct GenerationRepo;

impl GenerationRepo {
    /// Insert a new generation batch, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGeneration,
    ) -> Result<Generation, sqlx::Error> {
        let query = format!(
            "INSERT INTO generations (theme_id, session_name, base_prompt, variation_params)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(input.theme_id)
            .bind(&input.session_name)
            .bind(&input.base_prompt)
            .bind(&input.variation_params)
            .fetch_one(pool)
            .await
    }

    /// Find a generation by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generations WHERE id = $1");
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List generation batches for a theme, most recent first.
    pub async fn list_for_theme(
        pool: &PgPool,
        theme_id: DbId,
    ) -> Result<Vec<Generation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generations WHERE theme_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(theme_id)
            .fetch_all(pool)
            .await
    }

    /// Completion counters for one generation batch.
    ///
    /// `requested` comes from the stored variation parameters and falls
    /// back to the completed count for rows written without them.
    pub async fn progress(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GenerationProgress>, sqlx::Error> {
        sqlx::query_as::<_, GenerationProgress>(
            "SELECT g.id AS generation_id,
                    COALESCE((g.variation_params->>'num_variations')::BIGINT, COUNT(i.id))
                        AS requested,
                    COUNT(i.id) AS completed,
                    COUNT(i.rating) AS rated
             FROM generations g
             LEFT JOIN images i ON i.generation_id = g.id
             WHERE g.id = $1
             GROUP BY g.id",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
