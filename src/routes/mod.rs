// ABOUTME: Route module organization for the CookAI HTTP API
// ABOUTME: Merges domain routers and applies tracing, CORS and body size layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service layer.

/// Favorites routes
pub mod favorites;
/// Health check and readiness routes
pub mod health;
/// Recipe, image, substitution, macro, narration, voice input and share routes
pub mod recipes;
/// Recipe detail view routes
pub mod views;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

pub use favorites::FavoritesRoutes;
pub use health::HealthRoutes;
pub use recipes::RecipeRoutes;
pub use views::ViewRoutes;

use crate::constants::limits::MAX_REQUEST_BODY_BYTES;
use crate::resources::ServerResources;

/// Build the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(RecipeRoutes::routes(resources.clone()))
        .merge(FavoritesRoutes::routes(resources.clone()))
        .merge(ViewRoutes::routes(resources))
        // Voice clips arrive inline as base64
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
