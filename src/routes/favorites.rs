// ABOUTME: Route handlers for listing, toggling and removing favorite recipes
// ABOUTME: Favorites are identified by exact recipe name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::RecipeSuggestion;
use crate::resources::ServerResources;

/// Current favorites
#[derive(Debug, Serialize, Deserialize)]
pub struct FavoritesResponse {
    /// Favorites in insertion order
    pub favorites: Vec<RecipeSuggestion>,
}

/// Result of a toggle
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleFavoriteResponse {
    /// Whether the recipe is a favorite now
    pub favorite: bool,
    /// Favorites after the change
    pub favorites: Vec<RecipeSuggestion>,
}

/// Result of a removal
#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveFavoriteResponse {
    /// Whether a favorite with that name existed
    pub removed: bool,
    /// Favorites after the change
    pub favorites: Vec<RecipeSuggestion>,
}

/// Favorites routes handler
pub struct FavoritesRoutes;

impl FavoritesRoutes {
    /// Create all favorites routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/favorites", get(Self::handle_list))
            .route("/api/favorites/toggle", post(Self::handle_toggle))
            .route("/api/favorites/:name", delete(Self::handle_remove))
            .with_state(resources)
    }

    /// Handle GET /api/favorites
    async fn handle_list(State(resources): State<Arc<ServerResources>>) -> Response {
        let favorites = resources.favorites.list().await;
        (StatusCode::OK, Json(FavoritesResponse { favorites })).into_response()
    }

    /// Handle POST /api/favorites/toggle
    async fn handle_toggle(
        State(resources): State<Arc<ServerResources>>,
        Json(recipe): Json<RecipeSuggestion>,
    ) -> Result<Response, AppError> {
        if recipe.name.trim().is_empty() {
            return Err(AppError::invalid_input("Recipe name is required"));
        }
        let favorite = resources.favorites.toggle(recipe).await?;
        let favorites = resources.favorites.list().await;
        Ok((
            StatusCode::OK,
            Json(ToggleFavoriteResponse {
                favorite,
                favorites,
            }),
        )
            .into_response())
    }

    /// Handle DELETE /api/favorites/:name
    async fn handle_remove(
        State(resources): State<Arc<ServerResources>>,
        Path(name): Path<String>,
    ) -> Result<Response, AppError> {
        let removed = resources.favorites.remove(&name).await?;
        let favorites = resources.favorites.list().await;
        Ok((
            StatusCode::OK,
            Json(RemoveFavoriteResponse { removed, favorites }),
        )
            .into_response())
    }
}
