//! Integration tests for the `/api/v1/themes` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;
use textures_db::models::generation::CreateGeneration;
use textures_db::repositories::GenerationRepo;

async fn create_theme(pool: &PgPool, name: &str, base_prompt: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/themes",
        json!({"name": name, "base_prompt": base_prompt}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Test: CRUD round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_and_get_theme(pool: PgPool) {
    let id = create_theme(&pool, "Organic Cells", "organic ##cellular texture").await;

    let response = get(common::build_test_app(pool), &format!("/api/v1/themes/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Organic Cells");
    assert_eq!(json["base_prompt"], "organic ##cellular texture");
    assert!(json["parent_theme_id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_theme_partially(pool: PgPool) {
    let id = create_theme(&pool, "Before", "base ##grid").await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/themes/{id}"),
        json!({"name": "After"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "After");
    assert_eq!(json["base_prompt"], "base ##grid");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_theme_returns_no_content(pool: PgPool) {
    let id = create_theme(&pool, "Doomed", "base").await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/themes/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool), &format!("/api/v1/themes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Validation and error mapping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_empty_name_is_rejected(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/themes",
        json!({"name": "  ", "base_prompt": "base"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_missing_parent_returns_404(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/themes",
        json!({"name": "Orphan", "base_prompt": "base", "parent_theme_id": 424242}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_theme_returns_404_with_error_body(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/themes/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].is_string());
}

// ---------------------------------------------------------------------------
// Test: Branching and lineage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn branch_inherits_parent_prompt(pool: PgPool) {
    let parent_id = create_theme(&pool, "Parent", "parent ##fractal prompt").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/themes/{parent_id}/branch"),
        json!({"name": "Child"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let child = body_json(response).await;
    assert_eq!(child["parent_theme_id"], parent_id);
    assert_eq!(child["base_prompt"], "parent ##fractal prompt");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn lineage_walks_ancestors_and_children(pool: PgPool) {
    let root_id = create_theme(&pool, "Root", "root").await;

    let child = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/themes/{root_id}/branch"),
            json!({"name": "Child", "base_prompt": "child"}),
        )
        .await,
    )
    .await;
    let child_id = child["id"].as_i64().unwrap();

    let grandchild = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/themes/{child_id}/branch"),
            json!({"name": "Grandchild"}),
        )
        .await,
    )
    .await;
    let grandchild_id = grandchild["id"].as_i64().unwrap();

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/themes/{grandchild_id}/lineage"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["theme"]["id"], grandchild_id);
    // Nearest ancestor first.
    assert_eq!(json["ancestors"][0]["id"], child_id);
    assert_eq!(json["ancestors"][1]["id"], root_id);
    assert_eq!(json["children"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Test: Generation listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn generations_listed_most_recent_first(pool: PgPool) {
    let theme_id = create_theme(&pool, "Batched", "base ##fractal").await;
    let other_id = create_theme(&pool, "Other", "base ##grid").await;

    for (target, session) in [(theme_id, "first"), (theme_id, "second"), (other_id, "elsewhere")] {
        GenerationRepo::create(
            &pool,
            &CreateGeneration {
                theme_id: target,
                session_name: Some(session.to_string()),
                base_prompt: "base".to_string(),
                variation_params: None,
            },
        )
        .await
        .unwrap();
    }

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/themes/{theme_id}/generations"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let batches = json.as_array().unwrap();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0]["session_name"], "second");
    assert_eq!(batches[1]["session_name"], "first");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generations_for_missing_theme_return_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/themes/999999/generations").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn statistics_for_fresh_theme_are_zero(pool: PgPool) {
    let id = create_theme(&pool, "Fresh", "base").await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/themes/{id}/statistics"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["generation_count"], 0);
    assert_eq!(json["image_count"], 0);
    assert_eq!(json["rated_count"], 0);
    assert!(json["average_rating"].is_null());
}
