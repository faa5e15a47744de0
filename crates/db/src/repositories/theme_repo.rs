//! Repository for the `themes` table.

use sqlx::PgPool;
use textures_core::types::DbId;

use crate::models::theme::{CreateTheme, Theme, ThemeStatistics, UpdateTheme};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, base_prompt, parent_theme_id, created_at, updated_at";

/// Provides CRUD and lineage operations for themes.
pub struct ThemeRepo;

impl ThemeRepo {
    /// Insert a new theme, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTheme) -> Result<Theme, sqlx::Error> {
        let query = format!(
            "INSERT INTO themes (name, description, base_prompt, parent_theme_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Theme>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.base_prompt)
            .bind(input.parent_theme_id)
            .fetch_one(pool)
            .await
    }

    /// Find a theme by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes WHERE id = $1");
        sqlx::query_as::<_, Theme>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all themes, most recently created first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes ORDER BY created_at DESC");
        sqlx::query_as::<_, Theme>(&query).fetch_all(pool).await
    }

    /// List direct children of a theme, oldest first.
    pub async fn children(pool: &PgPool, id: DbId) -> Result<Vec<Theme>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM themes WHERE parent_theme_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Theme>(&query)
            .bind(id)
            .fetch_all(pool)
            .await
    }

    /// Update a theme. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTheme,
    ) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!(
            "UPDATE themes SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                base_prompt = COALESCE($4, base_prompt),
                updated_at  = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Theme>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.base_prompt)
            .fetch_optional(pool)
            .await
    }

    /// Delete a theme by ID. Children, generations and images cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM themes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Aggregate counters for one theme.
    pub async fn statistics(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ThemeStatistics>, sqlx::Error> {
        sqlx::query_as::<_, ThemeStatistics>(
            "SELECT t.id AS theme_id,
                    COUNT(DISTINCT g.id) AS generation_count,
                    COUNT(i.id) AS image_count,
                    COUNT(i.rating) AS rated_count,
                    AVG(i.rating)::FLOAT8 AS average_rating,
                    (SELECT COUNT(*) FROM themes c WHERE c.parent_theme_id = t.id) AS child_count
             FROM themes t
             LEFT JOIN generations g ON g.theme_id = t.id
             LEFT JOIN images i ON i.generation_id = g.id
             WHERE t.id = $1
             GROUP BY t.id",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
