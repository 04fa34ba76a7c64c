// ABOUTME: Audio narration of recipe instructions through speech synthesis
// ABOUTME: Wraps raw PCM speech in a WAV container so clients can play it directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::GenerativeBackend;
use crate::models::AudioNarration;

/// Reads instructions aloud
///
/// Every call synthesizes fresh audio; nothing is cached.
#[derive(Clone)]
pub struct AudioNarrator {
    backend: Arc<dyn GenerativeBackend>,
}

impl AudioNarrator {
    /// Create a narrator
    #[must_use]
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Synthesize speech for `text`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for blank text and `GenerationFailed` if the
    /// backend returns no audio or audio that cannot be decoded.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn narrate(&self, text: &str) -> AppResult<AudioNarration> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::invalid_input("Nothing to narrate"));
        }

        let audio = self
            .backend
            .synthesize_speech(text)
            .await?
            .ok_or_else(|| AppError::generation_failed("No audio was returned."))?;

        debug!(mime_type = %audio.mime_type, "Speech synthesized");
        let playable = audio.into_playable_audio().map_err(|e| {
            warn!(error = %e, "Synthesized speech could not be decoded");
            AppError::generation_failed("No audio was returned.")
        })?;

        Ok(AudioNarration {
            audio_data_uri: playable.to_string(),
        })
    }
}
