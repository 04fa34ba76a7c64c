// ABOUTME: Generative AI backend abstraction used by the kitchen services
// ABOUTME: Defines structured-output, image and speech generation contracts implemented by Gemini
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Generative Backend Interface
//!
//! Every kitchen service is a single round trip to a hosted model. This module
//! defines the seam between the services and the model vendor.
//!
//! ## Key Concepts
//!
//! - **`GenerativeBackend`**: async trait with one method per kind of output
//! - **`StructuredRequest`**: prompt, optional inline media and the JSON schema the
//!   answer must follow
//! - **No output vs. failure**: methods return `Ok(None)` when the model answered
//!   without a usable payload and `Err` when the call itself failed. Services turn
//!   `None` into a `GenerationFailed` error with their own message.
//!
//! ## Example: Using a Backend
//!
//! ```rust,no_run
//! use cookai::llm::{GenerativeBackend, StructuredRequest};
//! use serde_json::json;
//!
//! async fn example(backend: &dyn GenerativeBackend) {
//!     let schema = json!({"type": "object", "properties": {"answer": {"type": "string"}}});
//!     let request = StructuredRequest::new("Say hi", schema);
//!     let response = backend.generate_structured(&request).await;
//! }
//! ```

mod gemini;
pub mod prompts;
pub mod schema;

pub use gemini::{GeminiConfig, GeminiProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::media::DataUri;

/// Prompt plus declared output shape for a structured text generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredRequest {
    /// Rendered prompt text
    pub prompt: String,
    /// Media sent alongside the prompt (for example a recorded voice clip)
    pub media: Vec<DataUri>,
    /// Response schema in the `OpenAPI` subset Gemini accepts
    pub schema: serde_json::Value,
}

impl StructuredRequest {
    /// Create a text-only structured request
    #[must_use]
    pub fn new(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            prompt: prompt.into(),
            media: Vec::new(),
            schema,
        }
    }

    /// Attach inline media
    #[must_use]
    pub fn with_media(mut self, media: DataUri) -> Self {
        self.media.push(media);
        self
    }
}

/// Backend capable of the three kinds of generation the kitchen needs
///
/// Implementations must not retry; a failure is terminal for the user action
/// that triggered it.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Unique backend identifier (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Generate JSON matching `request.schema`
    ///
    /// Returns `Ok(None)` if the model produced no parsable JSON.
    async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> AppResult<Option<serde_json::Value>>;

    /// Generate one image for a text prompt
    ///
    /// Returns `Ok(None)` if the response carried no image.
    async fn generate_image(&self, prompt: &str) -> AppResult<Option<DataUri>>;

    /// Synthesize speech for `text`
    ///
    /// Returns `Ok(None)` if the response carried no audio. The payload may be raw PCM.
    async fn synthesize_speech(&self, text: &str) -> AppResult<Option<DataUri>>;

    /// Check if the backend is reachable and the API key is valid
    async fn health_check(&self) -> AppResult<bool>;
}
