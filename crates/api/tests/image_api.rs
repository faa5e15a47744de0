//! Integration tests for the `/api/v1/images` resource and the
//! generation status endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json};
use serde_json::json;
use sqlx::PgPool;
use textures_db::models::generation::CreateGeneration;
use textures_db::models::image::CreateImage;
use textures_db::models::theme::CreateTheme;
use textures_db::repositories::{GenerationRepo, ImageRepo, ThemeRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_image(pool: &PgPool, prompt: &str) -> (i64, i64) {
    let theme = ThemeRepo::create(
        pool,
        &CreateTheme {
            name: "Seeded".to_string(),
            description: None,
            base_prompt: "base ##fractal".to_string(),
            parent_theme_id: None,
        },
    )
    .await
    .unwrap();

    let generation = GenerationRepo::create(
        pool,
        &CreateGeneration {
            theme_id: theme.id,
            session_name: None,
            base_prompt: theme.base_prompt.clone(),
            variation_params: Some(json!({"num_variations": 1})),
        },
    )
    .await
    .unwrap();

    let image = ImageRepo::create(
        pool,
        &CreateImage {
            generation_id: generation.id,
            filename: "texture_1_1.png".to_string(),
            file_path: format!("theme_{}/gen_{}/texture_1_1.png", theme.id, generation.id),
            prompt: prompt.to_string(),
            keywords: vec!["fractal".to_string()],
            variation_params: None,
        },
    )
    .await
    .unwrap();

    (image.id, generation.id)
}

// ---------------------------------------------------------------------------
// Test: Rating
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rate_image_and_overwrite(pool: PgPool) {
    let (image_id, _) = seed_image(&pool, "a ##fractal texture").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/images/{image_id}/rate"),
        json!({"rating": 3}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rating"], 3);

    // Last write wins.
    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/images/{image_id}/rate"),
        json!({"rating": 5}),
    )
    .await;
    assert_eq!(body_json(response).await["rating"], 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rating_out_of_range_is_rejected(pool: PgPool) {
    let (image_id, _) = seed_image(&pool, "a texture").await;

    for bad_rating in [0, 6, -1] {
        let response = post_json(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/images/{image_id}/rate"),
            json!({"rating": bad_rating}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rate_missing_image_returns_404(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/images/999999/rate",
        json!({"rating": 4}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_min_rating(pool: PgPool) {
    let (low_id, _) = seed_image(&pool, "low").await;
    let (high_id, _) = seed_image(&pool, "high").await;
    ImageRepo::set_rating(&pool, low_id, 2).await.unwrap();
    ImageRepo::set_rating(&pool, high_id, 5).await.unwrap();

    let response = get(
        common::build_test_app(pool),
        "/api/v1/images?min_rating=4",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let images = json.as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["id"], high_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn recent_respects_limit(pool: PgPool) {
    for i in 0..3 {
        seed_image(&pool, &format!("prompt {i}")).await;
    }

    let response = get(common::build_test_app(pool), "/api/v1/images/recent?limit=2").await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Test: Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_image_removes_row(pool: PgPool) {
    let (image_id, _) = seed_image(&pool, "doomed").await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/images/{image_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(ImageRepo::find_by_id(&pool, image_id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: Generation endpoints without an API key
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn generate_without_api_key_returns_503(pool: PgPool) {
    let (_, _) = seed_image(&pool, "seed").await;
    let theme = ThemeRepo::list_all(&pool).await.unwrap().remove(0);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/generate",
        json!({"theme_id": theme.id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generate_with_invalid_params_is_rejected_before_upstream(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/generate",
        json!({"theme_id": 1, "num_variations": 9}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/generate",
        json!({"theme_id": 1, "size": "512x512"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generation_status_reports_progress(pool: PgPool) {
    let (image_id, generation_id) = seed_image(&pool, "tracked").await;
    ImageRepo::set_rating(&pool, image_id, 4).await.unwrap();

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/generate/status/{generation_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["requested"], 1);
    assert_eq!(json["completed"], 1);
    assert_eq!(json["rated"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generation_status_missing_returns_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/generate/status/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
