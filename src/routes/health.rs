// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness at /health, local readiness at /ready and AI backend reachability at /health/backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::constants::service_names;
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/ready", get(Self::ready_handler))
            .route("/health/backend", get(Self::backend_handler))
            .with_state(resources)
    }

    async fn health_handler() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": service_names::COOKAI_SERVER,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    /// Does not call the AI backend; a slow model must not fail readiness checks
    async fn ready_handler(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(json!({
            "status": "ready",
            "backend": resources.backend.name(),
            "environment": resources.environment.to_string(),
            "favorites": resources.favorites.list().await.len(),
            "open_views": resources.views.len(),
            "favorites_path": resources.favorites.path().display().to_string(),
            "uptime_seconds": resources.started_at.elapsed().as_secs(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    /// Round-trip to the AI backend; 503 when it is unreachable or rejects the key
    async fn backend_handler(State(resources): State<Arc<ServerResources>>) -> Response {
        let backend = resources.backend.name();
        let (status, error) = match resources.backend.health_check().await {
            Ok(true) => (StatusCode::OK, None),
            Ok(false) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Some("Backend rejected the health check".to_owned()),
            ),
            Err(e) => {
                warn!(backend, error = %e, "Backend health check failed");
                (StatusCode::SERVICE_UNAVAILABLE, Some(e.message))
            }
        };

        let body = json!({
            "status": if status.is_success() { "reachable" } else { "unreachable" },
            "backend": backend,
            "error": error,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        (status, Json(body)).into_response()
    }
}
