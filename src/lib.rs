// ABOUTME: Main library entry point for the CookAI kitchen API
// ABOUTME: AI recipe suggestions, substitutions, nutrition, narration and favorites over Gemini
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `CookAI`
//!
//! A kitchen assistant API. Users supply the ingredients they have, by text
//! or voice, and get three AI-generated recipes with pictures. From there
//! they can open a recipe, ask for ingredient substitutions, estimate
//! nutrition, listen to the instructions, share a recipe card and keep
//! favorites.
//!
//! ## Architecture
//!
//! - **LLM**: the `GenerativeBackend` trait and its Gemini implementation
//! - **Services**: one typed wrapper per generative round trip
//! - **Views**: recipe detail sessions with a per-view macro cache
//! - **Favorites**: versioned JSON file store with change notifications
//! - **Routes**: axum HTTP surface over all of the above
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cookai::config::environment::ServerConfig;
//! use cookai::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("CookAI configured with HTTP port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// Application constants grouped by domain
pub mod constants;

/// Unified error handling
pub mod errors;

/// Persisted favorite recipes
pub mod favorites;

/// Generative backend abstraction, Gemini provider, prompts and schemas
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Data URIs and audio containers
pub mod media;

/// Request and result records
pub mod models;

/// Shared state for route handlers
pub mod resources;

/// `HTTP` routes
pub mod routes;

/// Kitchen services
pub mod services;

/// Shareable recipe cards
pub mod share;

/// Scripted backend and sample data for tests
#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

/// Recipe detail views
pub mod views;
