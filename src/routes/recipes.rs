// ABOUTME: Route handlers for the kitchen services: recipes, images, substitutions, macros, audio
// ABOUTME: Thin JSON wrappers that delegate to the service layer and the share card renderer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Kitchen routes
//!
//! Every handler is one service call. Validation happens in the services so
//! the same rules apply to views and to direct API use.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{
    AudioClip, MacroRequest, RecipeSuggestion, RecipeSuggestionRequest, SubstitutionRequest,
};
use crate::resources::ServerResources;
use crate::share::ShareCard;

/// Response for recipe generation
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipesResponse {
    /// Exactly three suggestions
    pub recipes: Vec<RecipeSuggestion>,
}

/// Request for a single recipe picture
#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    /// Recipe to picture
    #[serde(alias = "recipeName")]
    pub recipe_name: String,
}

/// Request to narrate text
#[derive(Debug, Deserialize)]
pub struct NarrationRequest {
    /// Instructions to read aloud
    pub text: String,
}

/// Kitchen routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all kitchen routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipes", post(Self::handle_generate_recipes))
            .route("/api/recipes/image", post(Self::handle_generate_image))
            .route("/api/substitutions", post(Self::handle_substitutions))
            .route("/api/macros", post(Self::handle_macros))
            .route("/api/narration", post(Self::handle_narration))
            .route("/api/ingredients/detect", post(Self::handle_detect_ingredients))
            .route("/api/share", post(Self::handle_share))
            .with_state(resources)
    }

    /// Handle POST /api/recipes
    async fn handle_generate_recipes(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RecipeSuggestionRequest>,
    ) -> Result<Response, AppError> {
        let recipes = resources.services.recipes.generate(&request).await?;
        Ok((StatusCode::OK, Json(RecipesResponse { recipes })).into_response())
    }

    /// Handle POST /api/recipes/image
    async fn handle_generate_image(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ImageRequest>,
    ) -> Result<Response, AppError> {
        let image = resources
            .services
            .images
            .generate(&request.recipe_name)
            .await?;
        Ok((StatusCode::OK, Json(image)).into_response())
    }

    /// Handle POST /api/substitutions
    async fn handle_substitutions(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SubstitutionRequest>,
    ) -> Result<Response, AppError> {
        let result = resources.services.substitutions.suggest(&request).await?;
        Ok((StatusCode::OK, Json(result)).into_response())
    }

    /// Handle POST /api/macros
    async fn handle_macros(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<MacroRequest>,
    ) -> Result<Response, AppError> {
        let estimate = resources.services.macros.estimate(&request).await?;
        Ok((StatusCode::OK, Json(estimate)).into_response())
    }

    /// Handle POST /api/narration
    async fn handle_narration(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<NarrationRequest>,
    ) -> Result<Response, AppError> {
        let narration = resources.services.narrator.narrate(&request.text).await?;
        Ok((StatusCode::OK, Json(narration)).into_response())
    }

    /// Handle POST /api/ingredients/detect
    async fn handle_detect_ingredients(
        State(resources): State<Arc<ServerResources>>,
        Json(clip): Json<AudioClip>,
    ) -> Result<Response, AppError> {
        let detected = resources
            .services
            .ingredients
            .detect(&clip.audio_data_uri)
            .await?;
        Ok((StatusCode::OK, Json(detected)).into_response())
    }

    /// Handle POST /api/share
    async fn handle_share(Json(recipe): Json<RecipeSuggestion>) -> Result<Response, AppError> {
        let card = ShareCard::render(&recipe)?;
        Ok((StatusCode::OK, Json(card)).into_response())
    }
}
