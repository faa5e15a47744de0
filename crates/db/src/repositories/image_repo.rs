//! Repository for the `images` table.

use sqlx::PgPool;
use textures_core::types::DbId;

use crate::models::image::{CreateImage, GlobalStats, Image};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, generation_id, filename, file_path, prompt, keywords, rating, \
    variation_params, created_at";

/// Provides CRUD and history operations for generated images.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert a new image record, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateImage) -> Result<Image, sqlx::Error> {
        let query = format!(
            "INSERT INTO images
                (generation_id, filename, file_path, prompt, keywords, variation_params)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(input.generation_id)
            .bind(&input.filename)
            .bind(&input.file_path)
            .bind(&input.prompt)
            .bind(&input.keywords)
            .bind(&input.variation_params)
            .fetch_one(pool)
            .await
    }

    /// Find an image by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List images, most recent first, optionally filtered by minimum rating.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
        min_rating: Option<i32>,
    ) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM images
             WHERE ($3::INT IS NULL OR rating >= $3)
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(limit)
            .bind(offset)
            .bind(min_rating)
            .fetch_all(pool)
            .await
    }

    /// The most recently created images.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List all images belonging to a theme, most recent first.
    pub async fn list_for_theme(
        pool: &PgPool,
        theme_id: DbId,
    ) -> Result<Vec<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "SELECT i.id, i.generation_id, i.filename, i.file_path, i.prompt, i.keywords,
                    i.rating, i.variation_params, i.created_at
             FROM images i
             INNER JOIN generations g ON g.id = i.generation_id
             WHERE g.theme_id = $1
             ORDER BY i.created_at DESC",
        )
        .bind(theme_id)
        .fetch_all(pool)
        .await
    }

    /// A theme's images in creation order, for the analyzers.
    pub async fn theme_history(
        pool: &PgPool,
        theme_id: DbId,
    ) -> Result<Vec<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "SELECT i.id, i.generation_id, i.filename, i.file_path, i.prompt, i.keywords,
                    i.rating, i.variation_params, i.created_at
             FROM images i
             INNER JOIN generations g ON g.id = i.generation_id
             WHERE g.theme_id = $1
             ORDER BY i.created_at ASC",
        )
        .bind(theme_id)
        .fetch_all(pool)
        .await
    }

    /// Every image in creation order, for corpus-wide analytics.
    pub async fn all_history(pool: &PgPool) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images ORDER BY created_at ASC");
        sqlx::query_as::<_, Image>(&query).fetch_all(pool).await
    }

    /// Set or overwrite an image's rating. Last write wins.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_rating(
        pool: &PgPool,
        id: DbId,
        rating: i32,
    ) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("UPDATE images SET rating = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .bind(rating)
            .fetch_optional(pool)
            .await
    }

    /// Delete an image record by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Corpus-wide counters for the analytics summary.
    pub async fn global_stats(pool: &PgPool) -> Result<GlobalStats, sqlx::Error> {
        sqlx::query_as::<_, GlobalStats>(
            "SELECT (SELECT COUNT(*) FROM themes) AS total_themes,
                    (SELECT COUNT(*) FROM generations) AS total_generations,
                    COUNT(i.id) AS total_images,
                    COUNT(i.rating) AS rated_images,
                    AVG(i.rating)::FLOAT8 AS average_rating
             FROM images i",
        )
        .fetch_one(pool)
        .await
    }
}
