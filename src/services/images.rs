// ABOUTME: Single recipe picture generation from a fixed food-photography prompt
// ABOUTME: Returns the first image the model produces as a data URI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, GenerativeBackend};
use crate::models::GeneratedImage;

/// Generates plated food photos for recipe names
#[derive(Clone)]
pub struct ImageGenerator {
    backend: Arc<dyn GenerativeBackend>,
}

impl ImageGenerator {
    /// Create an image generator
    #[must_use]
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Generate one image for `recipe_name`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name and `GenerationFailed` if the
    /// backend answers without an image.
    #[instrument(skip(self))]
    pub async fn generate(&self, recipe_name: &str) -> AppResult<GeneratedImage> {
        if recipe_name.trim().is_empty() {
            return Err(AppError::invalid_input("Recipe name is required"));
        }

        let image = self
            .backend
            .generate_image(&prompts::recipe_image_prompt(recipe_name))
            .await?
            .ok_or_else(|| AppError::generation_failed("Image generation failed."))?;

        debug!(mime_type = %image.mime_type, "Recipe image generated");
        Ok(GeneratedImage {
            image_url: image.to_string(),
        })
    }
}
