// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-only configuration for the HTTP server, Gemini backend and favorites storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the `CookAI` server
//!
//! All settings come from environment variables (optionally loaded from a
//! `.env` file). See [`environment::ServerConfig::from_env`].

/// Environment and server configuration
pub mod environment;

pub use environment::{Environment, GeminiSettings, ServerConfig};
