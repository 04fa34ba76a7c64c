// ABOUTME: Google Gemini backend for structured JSON, image and speech generation
// ABOUTME: Talks to the Generative Language REST API with inline media parts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Gemini Provider
//!
//! Implementation of the `GenerativeBackend` trait for Google's Gemini models.
//!
//! ## Configuration
//!
//! Set the `GEMINI_API_KEY` environment variable with your API key from
//! Google AI Studio. Models default to:
//!
//! - `gemini-2.0-flash` for structured text
//! - `gemini-2.0-flash-preview-image-generation` for images
//! - `gemini-2.5-flash-preview-tts` for speech
//!
//! ## Example
//!
//! ```rust,no_run
//! use cookai::llm::{GeminiProvider, GenerativeBackend};
//! use cookai::errors::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let provider = GeminiProvider::from_env()?;
//!     let image = provider.generate_image("A bowl of ramen").await?;
//!     println!("{}", image.is_some());
//!     Ok(())
//! }
//! ```

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{GenerativeBackend, StructuredRequest};
use crate::constants::{env_vars, limits, models};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::media::DataUri;

/// Service name used in error messages
const SERVICE_NAME: &str = "Gemini";

/// Header carrying the API key; keeps it out of request URLs
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content structure for Gemini API
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

/// Part of content (inline media or text)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    /// Base64 media
    InlineData {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineData,
    },
    /// Text content
    Text { text: String },
    /// Anything else the API may send back (thoughts, executable code, ...)
    Other(serde_json::Value),
}

/// Inline media blob
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: String,
    data: String,
}

impl From<&DataUri> for ContentPart {
    fn from(uri: &DataUri) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: uri.mime_type.clone(),
                data: uri.data.clone(),
            },
        }
    }
}

/// Generation configuration
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate_count: Option<u32>,
}

/// Speech synthesis configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

/// Usage metadata from Gemini API response
#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiResponse {
    fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.as_ref().and_then(|c| c.first())
    }

    fn parts(&self) -> &[ContentPart] {
        self.first_candidate()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let text: String = self
            .parts()
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    /// First inline media part whose mime type starts with `prefix`
    fn inline_media(&self, prefix: &str) -> Option<DataUri> {
        self.parts().iter().find_map(|part| match part {
            ContentPart::InlineData { inline_data }
                if inline_data.mime_type.starts_with(prefix) && !inline_data.data.is_empty() =>
            {
                Some(DataUri::new(
                    inline_data.mime_type.clone(),
                    inline_data.data.clone(),
                ))
            }
            _ => None,
        })
    }

    fn finish_reason(&self) -> Option<&str> {
        self.first_candidate()
            .and_then(|c| c.finish_reason.as_deref())
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Connection and model settings for [`GeminiProvider`]
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header
    pub api_key: String,
    /// API base URL (overridable for tests and proxies)
    pub base_url: String,
    /// Model for structured text
    pub text_model: String,
    /// Model for images
    pub image_model: String,
    /// Model for speech
    pub tts_model: String,
    /// Prebuilt voice name
    pub tts_voice: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Default models against the public endpoint
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: models::GEMINI_API_BASE_URL.to_owned(),
            text_model: models::DEFAULT_TEXT_MODEL.to_owned(),
            image_model: models::DEFAULT_IMAGE_MODEL.to_owned(),
            tts_model: models::DEFAULT_TTS_MODEL.to_owned(),
            tts_voice: models::DEFAULT_TTS_VOICE.to_owned(),
            timeout: Duration::from_secs(limits::DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    /// Point at a different API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }
}

impl Debug for GeminiConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiConfig")
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

/// Google Gemini generative backend
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a provider from explicit settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: GeminiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> AppResult<Self> {
        let api_key = env::var(env_vars::GEMINI_API_KEY).map_err(|_| {
            AppError::new(
                ErrorCode::ConfigMissing,
                format!("{} environment variable not set", env_vars::GEMINI_API_KEY),
            )
        })?;
        Self::new(GeminiConfig::new(api_key))
    }

    /// Settings this provider was built with
    #[must_use]
    pub const fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Build the API URL for a model and method
    fn build_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.config.base_url)
    }

    /// Map a transport failure without echoing the request URL
    fn transport_error(context: &str, e: reqwest::Error) -> AppError {
        let code = if e.is_timeout() || e.is_connect() {
            ErrorCode::ExternalServiceUnavailable
        } else {
            ErrorCode::ExternalServiceError
        };
        let e = e.without_url();
        AppError::new(code, format!("{SERVICE_NAME} {context}: {e}"))
    }

    fn user_content(parts: Vec<ContentPart>) -> GeminiContent {
        GeminiContent {
            role: Some("user".to_owned()),
            parts,
        }
    }

    /// Send a `generateContent` request and decode the response envelope
    async fn generate_content(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> AppResult<GeminiResponse> {
        let url = self.build_url(model, "generateContent");

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Self::transport_error("request failed", e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| Self::transport_error("response could not be read", e))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, "Failed to parse Gemini response envelope");
                AppError::external_service(
                    SERVICE_NAME,
                    format!("Failed to parse response: {e}"),
                )
            })?;

        if let Some(error) = &gemini_response.error {
            return Err(AppError::external_service(
                SERVICE_NAME,
                error.message.clone(),
            ));
        }

        debug!(
            finish_reason = gemini_response.finish_reason().unwrap_or("unknown"),
            total_tokens = gemini_response
                .usage_metadata
                .as_ref()
                .and_then(|u| u.total)
                .unwrap_or(0),
            "Received Gemini response"
        );

        Ok(gemini_response)
    }

    /// Parse model text as JSON, tolerating a surrounding markdown code fence
    fn parse_json_text(text: &str) -> Option<serde_json::Value> {
        let trimmed = text.trim();
        let unfenced = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.strip_suffix("```"))
            .unwrap_or(trimmed);

        match serde_json::from_str(unfenced.trim()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Model text is not valid JSON");
                None
            }
        }
    }

    /// Map API error status to appropriate error type
    ///
    /// For rate limit (429) and quota errors, returns a user-friendly error
    /// that exposes the retry delay reported by Gemini.
    fn map_api_error(status: u16, response_text: &str) -> AppError {
        let message = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        match status {
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                Self::extract_quota_message(&message),
            ),
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("{SERVICE_NAME} rejected the API key ({status}): {message}"),
            ),
            500..=599 => AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("{SERVICE_NAME} API error ({status}): {message}"),
            ),
            _ => AppError::external_service(
                SERVICE_NAME,
                format!("API error ({status}): {message}"),
            ),
        }
    }

    /// Extract a user-friendly quota/rate limit message from Gemini error
    fn extract_quota_message(message: &str) -> String {
        // Example: "Please retry in 6.406453963s."
        const RETRY_PREFIX: &str = "Please retry in ";
        if let Some(retry_pos) = message.find(RETRY_PREFIX) {
            let after_prefix = &message[retry_pos + RETRY_PREFIX.len()..];
            if let Some(s_pos) = after_prefix.find('s') {
                if let Ok(seconds) = after_prefix[..s_pos].parse::<f64>() {
                    let seconds_int = seconds.ceil() as u64;
                    return format!(
                        "AI service quota exceeded. Please try again in {seconds_int} seconds."
                    );
                }
            }
        }
        "AI service quota exceeded. Please wait a moment and try again.".to_owned()
    }
}

#[async_trait]
impl GenerativeBackend for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %self.config.text_model, media = request.media.len()))]
    async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> AppResult<Option<serde_json::Value>> {
        let mut parts = vec![ContentPart::Text {
            text: request.prompt.clone(),
        }];
        parts.extend(request.media.iter().map(ContentPart::from));

        let gemini_request = GeminiRequest {
            contents: vec![Self::user_content(parts)],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                response_schema: Some(request.schema.clone()),
                candidate_count: Some(1),
                ..GenerationConfig::default()
            }),
        };

        let response = self
            .generate_content(&self.config.text_model, &gemini_request)
            .await?;

        Ok(response
            .text()
            .and_then(|text| Self::parse_json_text(&text)))
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.image_model))]
    async fn generate_image(&self, prompt: &str) -> AppResult<Option<DataUri>> {
        let gemini_request = GeminiRequest {
            contents: vec![Self::user_content(vec![ContentPart::Text {
                text: prompt.to_owned(),
            }])],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT", "IMAGE"]),
                ..GenerationConfig::default()
            }),
        };

        let response = self
            .generate_content(&self.config.image_model, &gemini_request)
            .await?;

        Ok(response.inline_media("image/"))
    }

    #[instrument(skip(self, text), fields(model = %self.config.tts_model, chars = text.len()))]
    async fn synthesize_speech(&self, text: &str) -> AppResult<Option<DataUri>> {
        let gemini_request = GeminiRequest {
            contents: vec![Self::user_content(vec![ContentPart::Text {
                text: text.to_owned(),
            }])],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO"]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.config.tts_voice.clone(),
                        },
                    },
                }),
                ..GenerationConfig::default()
            }),
        };

        let response = self
            .generate_content(&self.config.tts_model, &gemini_request)
            .await?;

        Ok(response.inline_media("audio/"))
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> AppResult<bool> {
        let url = format!("{}/models", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| Self::transport_error("health check failed", e))?;

        Ok(response.status().is_success())
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("config", &self.config)
            // Omit `client` field as HTTP clients are not useful to debug
            .finish_non_exhaustive()
    }
}
