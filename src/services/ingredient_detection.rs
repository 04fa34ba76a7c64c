// ABOUTME: Voice input: transcribes a recorded clip into a comma-separated ingredient list
// ABOUTME: Sends the audio inline alongside the detection prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use serde::Deserialize;
use tracing::{instrument, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, schema, GenerativeBackend, StructuredRequest};
use crate::media::DataUri;
use crate::models::{split_ingredient_list, DetectedIngredients};

const FAILURE_MESSAGE: &str = "Failed to detect ingredients from audio.";

#[derive(Debug, Deserialize)]
struct RawDetection {
    ingredients: String,
}

/// Turns a spoken ingredient list into text
#[derive(Clone)]
pub struct IngredientDetector {
    backend: Arc<dyn GenerativeBackend>,
}

impl IngredientDetector {
    /// Create a detector
    #[must_use]
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Detect ingredients mentioned in an `audio/*` data URI
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the clip is not an audio data URI and
    /// `GenerationFailed` if the model returns no output.
    #[instrument(skip(self, audio_data_uri))]
    pub async fn detect(&self, audio_data_uri: &str) -> AppResult<DetectedIngredients> {
        let clip = DataUri::parse(audio_data_uri.trim())
            .map_err(|e| AppError::invalid_input(e.message))?;
        if !clip.essence().starts_with("audio/") {
            return Err(AppError::invalid_input(format!(
                "Expected an audio recording, got {}",
                clip.mime_type
            )));
        }

        let structured = StructuredRequest::new(
            prompts::INGREDIENT_DETECTION_PROMPT,
            schema::detected_ingredients(),
        )
        .with_media(clip);
        let output = self
            .backend
            .generate_structured(&structured)
            .await?
            .ok_or_else(|| AppError::generation_failed(FAILURE_MESSAGE))?;

        let RawDetection { ingredients } = serde_json::from_value(output).map_err(|e| {
            warn!(error = %e, "Malformed ingredient detection output");
            AppError::generation_failed(FAILURE_MESSAGE)
        })?;

        Ok(DetectedIngredients {
            ingredients: split_ingredient_list(&ingredients).join(", "),
        })
    }
}
