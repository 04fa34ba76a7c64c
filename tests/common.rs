// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging and server resources wired to a scripted backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::expect_used
)]
//! Shared test utilities for `cookai`

use std::sync::{Arc, Once};

use cookai::favorites::FavoritesStore;
use cookai::resources::ServerResources;
use cookai::services::ImagePolicy;
use cookai::test_utils::ScriptedBackend;
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Resources around a scripted backend, with favorites in a temp directory
///
/// The `TempDir` must outlive the resources.
pub async fn create_test_resources(
    backend: Arc<ScriptedBackend>,
    policy: ImagePolicy,
) -> (Arc<ServerResources>, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let favorites = FavoritesStore::open(dir.path().join("favorites.json"))
        .await
        .expect("Failed to open favorites store");
    let resources = ServerResources::new(backend, favorites, 3, policy);
    (Arc::new(resources), dir)
}
