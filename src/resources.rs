// ABOUTME: Shared server resources handed to every route as axum state
// ABOUTME: Holds the generative backend, kitchen services, favorites store and open views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::config::{Environment, ServerConfig};
use crate::errors::AppResult;
use crate::favorites::FavoritesStore;
use crate::llm::{GeminiProvider, GenerativeBackend};
use crate::services::{ImagePolicy, KitchenServices};
use crate::views::ViewRegistry;

/// Everything a request handler may need
pub struct ServerResources {
    /// Generative backend shared by all services
    pub backend: Arc<dyn GenerativeBackend>,
    /// Kitchen services
    pub services: KitchenServices,
    /// Persisted favorites
    pub favorites: FavoritesStore,
    /// Open recipe detail views
    pub views: ViewRegistry,
    /// Deployment environment
    pub environment: Environment,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl ServerResources {
    /// Assemble resources around an existing backend and favorites store
    #[must_use]
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        favorites: FavoritesStore,
        image_concurrency: usize,
        image_policy: ImagePolicy,
    ) -> Self {
        Self {
            services: KitchenServices::new(backend.clone(), image_concurrency, image_policy),
            backend,
            favorites,
            views: ViewRegistry::new(),
            environment: Environment::default(),
            started_at: Instant::now(),
        }
    }

    /// Set the deployment environment
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Build the Gemini backend and open the favorites file described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the favorites
    /// file cannot be read.
    pub async fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let backend: Arc<dyn GenerativeBackend> =
            Arc::new(GeminiProvider::new(config.gemini.to_client_config())?);
        let favorites = FavoritesStore::open(config.favorites_path.clone()).await?;
        info!(
            backend = backend.name(),
            favorites = favorites.list().await.len(),
            favorites_path = %favorites.path().display(),
            "Server resources initialized"
        );

        Ok(
            Self::new(backend, favorites, config.image_concurrency, config.image_policy)
                .with_environment(config.environment),
        )
    }
}
