//! Handlers for the `/generate` resource: the full request-to-images
//! orchestration.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use textures_core::keywords::extract_keywords;
use textures_core::policy::{DEFAULT_IMAGE_SIZE, DEFAULT_QUALITY, DEFAULT_VARIATIONS};
use textures_core::prompts::{generate_variations, Variation};
use textures_core::types::DbId;
use textures_core::validation::{validate_image_size, validate_num_variations, validate_quality};
use textures_db::models::generation::{CreateGeneration, GenerationProgress};
use textures_db::models::image::{CreateImage, Image};
use textures_db::repositories::{GenerationRepo, ImageRepo};
use textures_openai::structure::{combine_prompts, strip_tags};
use textures_openai::OpenAiApi;

use crate::error::{AppError, AppResult};
use crate::handlers::{themes, to_history};
use crate::state::AppState;

/// Request body for `POST /generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub theme_id: DbId,
    pub num_variations: Option<u32>,
    pub size: Option<String>,
    pub quality: Option<String>,
    pub session_name: Option<String>,
}

/// Response for a completed generation batch.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub generation_id: DbId,
    pub theme_id: DbId,
    pub requested: u32,
    pub completed: usize,
    pub failed: usize,
    pub images: Vec<Image>,
}

/// POST /api/v1/generate
///
/// Runs one feedback-loop round: derive prompt variations from the
/// theme's rated history, fan out one image request per variation in
/// parallel, then store the successes. One variation's failure does not
/// abort the others; only zero successes is an error.
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<(StatusCode, Json<GenerateResponse>)> {
    let num_variations = input.num_variations.unwrap_or(DEFAULT_VARIATIONS);
    let size = input.size.as_deref().unwrap_or(DEFAULT_IMAGE_SIZE);
    let quality = input.quality.as_deref().unwrap_or(DEFAULT_QUALITY);

    validate_num_variations(num_variations)?;
    validate_image_size(size)?;
    validate_quality(quality)?;

    let openai = state.openai.clone().ok_or_else(|| {
        AppError::ServiceUnavailable("OPENAI_API_KEY is not configured".into())
    })?;

    let theme = themes::ensure_theme_exists(&state, input.theme_id).await?;

    let history_rows = ImageRepo::theme_history(&state.pool, theme.id).await?;
    let history = to_history(&history_rows);

    let variations = generate_variations(
        &theme.base_prompt,
        num_variations,
        &history,
        &mut rand::rng(),
    );

    let generation = GenerationRepo::create(
        &state.pool,
        &CreateGeneration {
            theme_id: theme.id,
            session_name: input.session_name,
            base_prompt: theme.base_prompt.clone(),
            variation_params: Some(serde_json::json!({
                "num_variations": num_variations,
                "size": size,
                "quality": quality,
            })),
        },
    )
    .await?;

    // One API call per variation, in parallel, failures isolated.
    let tasks = variations.iter().enumerate().map(|(index, variation)| {
        fetch_variation(
            Arc::clone(&openai),
            &state.structure_prompt,
            variation,
            index,
            size,
            quality,
        )
    });
    let outcomes = join_all(tasks).await;

    let gen_dir = state
        .config
        .images_dir
        .join(format!("theme_{}", theme.id))
        .join(format!("gen_{}", generation.id));
    tokio::fs::create_dir_all(&gen_dir)
        .await
        .map_err(|err| AppError::InternalError(format!("failed to create image dir: {err}")))?;

    // Successes are written and recorded one at a time.
    let mut images = Vec::new();
    let mut failed = 0usize;
    for outcome in outcomes {
        let (index, variation, bytes) = match outcome {
            Ok(fetched) => fetched,
            Err(err) => {
                tracing::error!(error = %err, "variation generation failed");
                failed += 1;
                continue;
            }
        };

        let filename = format!("texture_{}_{}.png", generation.id, index + 1);
        let absolute = gen_dir.join(&filename);
        if let Err(err) = tokio::fs::write(&absolute, &bytes).await {
            tracing::error!(path = %absolute.display(), error = %err, "failed to write image file");
            failed += 1;
            continue;
        }

        let relative = format!("theme_{}/gen_{}/{filename}", theme.id, generation.id);
        let image = ImageRepo::create(
            &state.pool,
            &CreateImage {
                generation_id: generation.id,
                filename,
                file_path: relative,
                prompt: variation.prompt.clone(),
                keywords: extract_keywords(&variation.prompt),
                variation_params: Some(serde_json::json!({
                    "strategy": variation.strategy,
                    "changes": variation.changes,
                    "variation_index": index,
                })),
            },
        )
        .await?;
        images.push(image);
    }

    if images.is_empty() {
        return Err(AppError::InternalError(
            "all image variations failed to generate".into(),
        ));
    }

    tracing::info!(
        generation_id = generation.id,
        theme_id = theme.id,
        completed = images.len(),
        failed,
        "generation batch finished"
    );

    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            generation_id: generation.id,
            theme_id: theme.id,
            requested: num_variations,
            completed: images.len(),
            failed,
            images,
        }),
    ))
}

/// GET /api/v1/generate/status/{generation_id}
pub async fn status(
    State(state): State<AppState>,
    Path(generation_id): Path<DbId>,
) -> AppResult<Json<GenerationProgress>> {
    let progress = GenerationRepo::progress(&state.pool, generation_id)
        .await?
        .ok_or(AppError::Core(textures_core::error::CoreError::NotFound {
            entity: "Generation",
            id: generation_id,
        }))?;
    Ok(Json(progress))
}

/// Generate and download one variation's image bytes.
///
/// The tracking tags stay in the stored prompt; the API sees the cleaned,
/// structure-constrained text.
async fn fetch_variation<'a>(
    openai: Arc<OpenAiApi>,
    structure_prompt: &str,
    variation: &'a Variation,
    index: usize,
    size: &str,
    quality: &str,
) -> Result<(usize, &'a Variation, Vec<u8>), textures_openai::OpenAiApiError> {
    let combined = combine_prompts(&variation.prompt, structure_prompt);
    let clean = strip_tags(&combined);

    let url = openai.generate_image(&clean, size, quality).await?;
    let bytes = openai.download_image(&url).await?;
    Ok((index, variation, bytes))
}
