// ABOUTME: Route handlers for recipe detail views and their cached macro estimates
// ABOUTME: Open, inspect and close views; per-view macros, narration and substitutions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::RecipeSuggestion;
use crate::resources::ServerResources;

/// Request to open a view
#[derive(Debug, Deserialize)]
pub struct OpenViewRequest {
    /// Recipe to show
    pub recipe: RecipeSuggestion,
    /// Ingredients the cook has, used for substitutions
    #[serde(default, alias = "availableIngredients")]
    pub available_ingredients: Vec<String>,
}

/// Id of a newly opened view
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenViewResponse {
    /// View id
    pub view_id: Uuid,
}

/// Missing ingredients picked in a view
#[derive(Debug, Deserialize)]
pub struct ViewSubstitutionRequest {
    /// Ingredients of the recipe the cook lacks
    #[serde(alias = "missingIngredients")]
    pub missing_ingredients: Vec<String>,
}

/// View routes handler
pub struct ViewRoutes;

impl ViewRoutes {
    /// Create all view routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/views", post(Self::handle_open))
            .route(
                "/api/views/:id",
                get(Self::handle_get).delete(Self::handle_close),
            )
            .route("/api/views/:id/macros", post(Self::handle_macros))
            .route("/api/views/:id/narration", post(Self::handle_narration))
            .route(
                "/api/views/:id/substitutions",
                post(Self::handle_substitutions),
            )
            .with_state(resources)
    }

    /// Handle POST /api/views
    async fn handle_open(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<OpenViewRequest>,
    ) -> Result<Response, AppError> {
        if !request.recipe.is_complete() {
            return Err(AppError::invalid_input(
                "Recipe needs a name, ingredients and instructions",
            ));
        }
        let view = resources
            .views
            .open(request.recipe, &request.available_ingredients);
        Ok((
            StatusCode::CREATED,
            Json(OpenViewResponse { view_id: view.id() }),
        )
            .into_response())
    }

    /// Handle GET /api/views/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let view = resources.views.get(id)?;
        Ok((StatusCode::OK, Json(view.detail())).into_response())
    }

    /// Handle DELETE /api/views/:id
    async fn handle_close(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        resources.views.close(id)?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/views/:id/macros
    async fn handle_macros(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let view = resources.views.get(id)?;
        let estimate = view.macros(&resources.services).await?;
        Ok((StatusCode::OK, Json(estimate)).into_response())
    }

    /// Handle POST /api/views/:id/narration
    async fn handle_narration(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let view = resources.views.get(id)?;
        let narration = view.narrate(&resources.services).await?;
        Ok((StatusCode::OK, Json(narration)).into_response())
    }

    /// Handle POST /api/views/:id/substitutions
    async fn handle_substitutions(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(request): Json<ViewSubstitutionRequest>,
    ) -> Result<Response, AppError> {
        let view = resources.views.get(id)?;
        let result = view
            .substitutions(&resources.services, &request.missing_ingredients)
            .await?;
        Ok((StatusCode::OK, Json(result)).into_response())
    }
}
