// ABOUTME: HTTP route tests for the kitchen API driven through the full axum router
// ABOUTME: Covers success bodies, status codes and the JSON error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use cookai::routes::{
    self, favorites::FavoritesResponse, recipes::RecipesResponse, views::OpenViewResponse,
};
use cookai::services::ImagePolicy;
use cookai::test_utils::{sample_pcm_speech, sample_recipe, three_recipes_json, ScriptedBackend};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

async fn app_with(
    backend: ScriptedBackend,
) -> (axum::Router, Arc<ScriptedBackend>, tempfile::TempDir) {
    let backend = Arc::new(backend);
    let (resources, dir) =
        common::create_test_resources(backend.clone(), ImagePolicy::AllOrNothing).await;
    (routes::router(resources), backend, dir)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_health_and_ready() {
    let (app, _backend, _dir) = app_with(ScriptedBackend::new()).await;

    let health = AxumTestRequest::get("/health").send(app.clone()).await;
    assert_eq!(health.status(), 200);
    assert_eq!(health.json::<Value>()["status"], "healthy");

    let ready = AxumTestRequest::get("/ready").send(app).await;
    assert_eq!(ready.status(), 200);
    let body: Value = ready.json();
    assert_eq!(body["backend"], "scripted");
    assert_eq!(body["favorites"], 0);
    assert!(body["favorites_path"]
        .as_str()
        .unwrap()
        .ends_with("favorites.json"));
}

#[tokio::test]
async fn test_backend_health_reports_reachability() {
    let (app, _backend, _dir) = app_with(ScriptedBackend::new()).await;
    let up = AxumTestRequest::get("/health/backend").send(app).await;
    assert_eq!(up.status(), 200);
    let body: Value = up.json();
    assert_eq!(body["status"], "reachable");
    assert_eq!(body["backend"], "scripted");

    let (app, _backend, _dir) = app_with(ScriptedBackend::new().with_unhealthy()).await;
    let down = AxumTestRequest::get("/health/backend").send(app).await;
    assert_eq!(down.status(), 503);
    assert_eq!(down.json::<Value>()["status"], "unreachable");
}

#[tokio::test]
async fn test_generate_recipes_returns_three_with_images() {
    let (app, backend, _dir) =
        app_with(ScriptedBackend::new().with_structured(three_recipes_json())).await;

    let response = AxumTestRequest::post("/api/recipes")
        .json(&json!({
            "ingredients": "chicken breast, tomato, rice, onion, garlic",
            "dietaryRestrictions": "gluten-free"
        }))
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: RecipesResponse = response.json();
    assert_eq!(body.recipes.len(), 3);
    assert!(body
        .recipes
        .iter()
        .all(|r| r
            .image_url
            .as_deref()
            .is_some_and(|u| u.starts_with("data:image/png;base64,"))));
    assert_eq!(backend.image_calls(), 3);

    let prompt = &backend.structured_requests()[0].prompt;
    assert!(prompt.contains("gluten-free"));
}

#[tokio::test]
async fn test_short_ingredient_list_is_rejected_without_calling_model() {
    let (app, backend, _dir) = app_with(ScriptedBackend::new()).await;

    let response = AxumTestRequest::post("/api/recipes")
        .json(&json!({"ingredients": "  egg  "}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(error_code(&response.json()), "INVALID_INPUT");
    assert_eq!(backend.structured_calls(), 0);
}

#[tokio::test]
async fn test_model_without_output_maps_to_bad_gateway() {
    let (app, _backend, _dir) = app_with(ScriptedBackend::new()).await;

    let response = AxumTestRequest::post("/api/recipes")
        .json(&json!({"ingredients": "chicken breast, tomato, rice"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 502);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "GENERATION_FAILED");
    assert_eq!(body["error"]["message"], "Unable to generate recipes.");
}

#[tokio::test]
async fn test_substitutions_endpoint() {
    let (app, _backend, _dir) = app_with(ScriptedBackend::new().with_structured(json!({
        "substitutions": {"eggs": "applesauce, mashed banana", "butter": null}
    })))
    .await;

    let response = AxumTestRequest::post("/api/substitutions")
        .json(&json!({
            "recipeName": "Banana Pancakes",
            "missingIngredients": ["eggs", "butter"],
            "availableIngredients": ["applesauce", "mashed banana"]
        }))
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["substitutions"]["eggs"], "applesauce, mashed banana");
    assert_eq!(body["substitutions"]["butter"], "");
}

#[tokio::test]
async fn test_macros_endpoint_rejects_implausible_values() {
    let (app, _backend, _dir) = app_with(
        ScriptedBackend::new()
            .with_structured(json!({"calories": 540, "protein": 42.5, "carbs": 61, "fat": 12}))
            .with_structured(json!({"calories": -5, "protein": 1, "carbs": 1, "fat": 1})),
    )
    .await;
    let request = json!({
        "recipeName": "Chicken Tomato Rice",
        "ingredients": "chicken breast, tomato, rice"
    });

    let ok = AxumTestRequest::post("/api/macros")
        .json(&request)
        .send(app.clone())
        .await;
    assert_eq!(ok.status(), 200);
    let body: Value = ok.json();
    assert_eq!(body["calories"], 540.0);
    assert_eq!(body["protein"], 42.5);

    let bad = AxumTestRequest::post("/api/macros")
        .json(&request)
        .send(app)
        .await;
    assert_eq!(bad.status(), 502);
    assert_eq!(bad.json::<Value>()["error"]["message"], "Failed to calculate macros.");
}

#[tokio::test]
async fn test_narration_endpoint_returns_wav() {
    let (app, backend, _dir) =
        app_with(ScriptedBackend::new().with_speech(sample_pcm_speech())).await;

    let response = AxumTestRequest::post("/api/narration")
        .json(&json!({"text": "Cook the rice. Sear the chicken."}))
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert!(body["audio_data_uri"]
        .as_str()
        .unwrap()
        .starts_with("data:audio/wav;base64,"));
    assert_eq!(backend.speech_calls(), 1);
}

#[tokio::test]
async fn test_detect_ingredients_rejects_non_audio() {
    let (app, backend, _dir) = app_with(ScriptedBackend::new()).await;

    let response = AxumTestRequest::post("/api/ingredients/detect")
        .json(&json!({"audioDataUri": "data:image/png;base64,iVBORw0KGgo="}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(backend.structured_calls(), 0);
}

#[tokio::test]
async fn test_share_card_endpoint() {
    let (app, _backend, _dir) = app_with(ScriptedBackend::new()).await;

    let response = AxumTestRequest::post("/api/share")
        .json(&sample_recipe("Chicken Tomato Rice"))
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["file_name"], "Chicken-Tomato-Rice-recipe.svg");
    assert!(body["data_uri"]
        .as_str()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));
}

#[tokio::test]
async fn test_favorites_toggle_and_delete() {
    let (app, _backend, _dir) = app_with(ScriptedBackend::new()).await;
    let recipe = sample_recipe("Stuffed Tomatoes");

    let added = AxumTestRequest::post("/api/favorites/toggle")
        .json(&recipe)
        .send(app.clone())
        .await;
    assert_eq!(added.status(), 200);
    let body: Value = added.json();
    assert_eq!(body["favorite"], true);
    assert_eq!(body["favorites"].as_array().map(Vec::len), Some(1));

    let listed: FavoritesResponse = AxumTestRequest::get("/api/favorites")
        .send(app.clone())
        .await
        .json();
    assert_eq!(listed.favorites, vec![recipe]);

    let removed = AxumTestRequest::delete("/api/favorites/Stuffed%20Tomatoes")
        .send(app.clone())
        .await;
    assert_eq!(removed.status(), 200);
    let body: Value = removed.json();
    assert_eq!(body["removed"], true);
    assert_eq!(body["favorites"], json!([]));

    let again = AxumTestRequest::delete("/api/favorites/Stuffed%20Tomatoes")
        .send(app)
        .await;
    assert_eq!(again.json::<Value>()["removed"], false);
}

#[tokio::test]
async fn test_view_lifecycle_caches_macros() {
    let (app, backend, _dir) = app_with(ScriptedBackend::new().with_structured(json!({
        "calories": 610, "protein": 45, "carbs": 70, "fat": 14
    })))
    .await;

    let opened = AxumTestRequest::post("/api/views")
        .json(&json!({
            "recipe": sample_recipe("Chicken Tomato Rice"),
            "availableIngredients": ["chicken breast", "rice"]
        }))
        .send(app.clone())
        .await;
    assert_eq!(opened.status(), 201);
    let view_id = opened.json::<OpenViewResponse>().view_id;

    for _ in 0..2 {
        let macros = AxumTestRequest::post(&format!("/api/views/{view_id}/macros"))
            .send(app.clone())
            .await;
        assert_eq!(macros.status(), 200);
        assert_eq!(macros.json::<Value>()["calories"], 610.0);
    }
    assert_eq!(backend.structured_calls(), 1);

    let detail: Value = AxumTestRequest::get(&format!("/api/views/{view_id}"))
        .send(app.clone())
        .await
        .json();
    assert_eq!(detail["macros"]["fat"], 14.0);
    assert_eq!(detail["ingredient_list"].as_array().map(Vec::len), Some(5));

    let closed = AxumTestRequest::delete(&format!("/api/views/{view_id}"))
        .send(app.clone())
        .await;
    assert_eq!(closed.status(), 204);

    let gone = AxumTestRequest::get(&format!("/api/views/{view_id}"))
        .send(app)
        .await;
    assert_eq!(gone.status(), 404);
    assert_eq!(error_code(&gone.json()), "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_view_substitutions_require_recipe_ingredients() {
    let (app, backend, _dir) = app_with(ScriptedBackend::new()).await;

    let opened = AxumTestRequest::post("/api/views")
        .json(&json!({"recipe": sample_recipe("Chicken Tomato Rice")}))
        .send(app.clone())
        .await;
    let view_id = opened.json::<OpenViewResponse>().view_id;

    let response = AxumTestRequest::post(&format!("/api/views/{view_id}/substitutions"))
        .json(&json!({"missingIngredients": ["saffron"]}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(backend.structured_calls(), 0);
}

#[tokio::test]
async fn test_open_view_rejects_incomplete_recipe() {
    let (app, _backend, _dir) = app_with(ScriptedBackend::new()).await;

    let response = AxumTestRequest::post("/api/views")
        .json(&json!({"recipe": {"name": "Soup", "ingredients": "", "instructions": ""}}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
}
