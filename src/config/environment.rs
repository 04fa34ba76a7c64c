// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, Gemini models, image fan-out policy and favorites path from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{env_vars, limits, models, storage};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::GeminiConfig;
use crate::services::ImagePolicy;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    /// Local development
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Gemini connection settings
#[derive(Clone)]
pub struct GeminiSettings {
    /// API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Structured text model
    pub text_model: String,
    /// Image model
    pub image_model: String,
    /// Speech model
    pub tts_model: String,
    /// Speech voice
    pub tts_voice: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GeminiSettings {
    /// Client configuration for [`crate::llm::GeminiProvider`]
    #[must_use]
    pub fn to_client_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.trim_end_matches('/').to_owned(),
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
            tts_model: self.tts_model.clone(),
            tts_voice: self.tts_voice.clone(),
            timeout: self.timeout,
        }
    }
}

impl std::fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("tts_model", &self.tts_model)
            .field("tts_voice", &self.tts_voice)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Main server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Gemini backend
    pub gemini: GeminiSettings,
    /// Favorites JSON file
    pub favorites_path: PathBuf,
    /// Image calls in flight per recipe generation
    pub image_concurrency: usize,
    /// Behavior when an image call fails
    pub image_policy: ImagePolicy,
}

/// Load a `.env` file from the working directory or its parents
///
/// Run this before logging is initialized so `RUST_LOG` and friends can come
/// from the file, then log the outcome once a subscriber exists. Variables
/// already set in the process environment are not overridden.
///
/// # Errors
///
/// Returns the loader error when no file was found or it could not be parsed.
pub fn load_dotenv() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Does not read `.env`; call [`load_dotenv`] first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` if `GEMINI_API_KEY` is unset or blank, and
    /// `ConfigInvalid` if a numeric or enum variable cannot be parsed.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let api_key = env::var(env_vars::GEMINI_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::new(
                    ErrorCode::ConfigMissing,
                    format!("{} must be set", env_vars::GEMINI_API_KEY),
                )
            })?;

        let config = Self {
            http_port: env_parse(env_vars::HTTP_PORT, DEFAULT_HTTP_PORT)?,
            environment: Environment::from_str_or_default(&env_var_or(
                env_vars::ENVIRONMENT,
                "development",
            )),
            gemini: GeminiSettings {
                api_key,
                base_url: env_var_or(env_vars::GEMINI_BASE_URL, models::GEMINI_API_BASE_URL),
                text_model: env_var_or(env_vars::TEXT_MODEL, models::DEFAULT_TEXT_MODEL),
                image_model: env_var_or(env_vars::IMAGE_MODEL, models::DEFAULT_IMAGE_MODEL),
                tts_model: env_var_or(env_vars::TTS_MODEL, models::DEFAULT_TTS_MODEL),
                tts_voice: env_var_or(env_vars::TTS_VOICE, models::DEFAULT_TTS_VOICE),
                timeout: Duration::from_secs(env_parse(
                    env_vars::HTTP_TIMEOUT_SECS,
                    limits::DEFAULT_HTTP_TIMEOUT_SECS,
                )?),
            },
            favorites_path: PathBuf::from(env_var_or(
                env_vars::FAVORITES_PATH,
                storage::DEFAULT_FAVORITES_PATH,
            )),
            image_concurrency: env_parse(
                env_vars::IMAGE_CONCURRENCY,
                limits::DEFAULT_IMAGE_CONCURRENCY,
            )?,
            image_policy: env_parse(env_vars::IMAGE_POLICY, ImagePolicy::default())?,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for a zero image concurrency or timeout.
    pub fn validate(&self) -> AppResult<()> {
        if self.image_concurrency == 0 {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{} must be at least 1", env_vars::IMAGE_CONCURRENCY),
            ));
        }
        if self.gemini.timeout.is_zero() {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{} must be at least 1", env_vars::HTTP_TIMEOUT_SECS),
            ));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "CookAI Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Gemini API: {}\n\
             - Text Model: {}\n\
             - Image Model: {}\n\
             - Speech Model: {} (voice {})\n\
             - Request Timeout: {}s\n\
             - Image Fan-out: {} ({:?})\n\
             - Favorites File: {}",
            self.http_port,
            self.environment,
            self.gemini.base_url,
            self.gemini.text_model,
            self.gemini.image_model,
            self.gemini.tts_model,
            self.gemini.tts_voice,
            self.gemini.timeout.as_secs(),
            self.image_concurrency,
            self.image_policy,
            self.favorites_path.display(),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn env_parse<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e| {
            AppError::new(
                ErrorCode::ConfigInvalid,
                format!("Invalid value for {key} ('{raw}'): {e}"),
            )
        }),
        _ => Ok(default),
    }
}
