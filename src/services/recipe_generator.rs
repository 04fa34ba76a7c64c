// ABOUTME: Recipe generation: one structured call for suggestions, then a bounded image fan-out
// ABOUTME: Enforces the ingredient length floor, exact recipe count and the configured image policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::str::FromStr;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::images::ImageGenerator;
use crate::constants::limits::{MIN_INGREDIENTS_LEN, RECIPE_COUNT};
use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, schema, GenerativeBackend, StructuredRequest};
use crate::models::{RecipeSuggestion, RecipeSuggestionRequest};

/// What to do when one of the per-recipe image calls fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePolicy {
    /// Any image failure fails the whole generation
    #[default]
    AllOrNothing,
    /// Failed images leave `image_url` empty
    BestEffort,
}

impl FromStr for ImagePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all_or_nothing" | "strict" => Ok(Self::AllOrNothing),
            "best_effort" | "partial" => Ok(Self::BestEffort),
            other => Err(AppError::config(format!(
                "Unknown image policy '{other}' (expected all_or_nothing or best_effort)"
            ))),
        }
    }
}

/// Raw model output, decoded before validation
#[derive(Debug, Deserialize)]
struct GeneratedRecipes {
    recipes: Vec<RecipeSuggestion>,
}

/// Generates recipe suggestions and their pictures
#[derive(Clone)]
pub struct RecipeGenerator {
    backend: Arc<dyn GenerativeBackend>,
    images: ImageGenerator,
    image_concurrency: usize,
    image_policy: ImagePolicy,
}

impl RecipeGenerator {
    /// Create a generator
    ///
    /// `image_concurrency` is clamped to at least one request in flight.
    #[must_use]
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        image_concurrency: usize,
        image_policy: ImagePolicy,
    ) -> Self {
        Self {
            images: ImageGenerator::new(backend.clone()),
            backend,
            image_concurrency: image_concurrency.max(1),
            image_policy,
        }
    }

    /// Suggest exactly three recipes for the given ingredients, each with an image
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the ingredient text is shorter than the minimum,
    /// and `GenerationFailed` if the model returns no output, a malformed answer,
    /// the wrong number of recipes, or (under `AllOrNothing`) any image fails.
    #[instrument(skip(self, request), fields(ingredients_len = request.ingredients.trim().len()))]
    pub async fn generate(
        &self,
        request: &RecipeSuggestionRequest,
    ) -> AppResult<Vec<RecipeSuggestion>> {
        let ingredients = request.ingredients.trim();
        if ingredients.chars().count() < MIN_INGREDIENTS_LEN {
            return Err(AppError::invalid_input(format!(
                "Please enter at least {MIN_INGREDIENTS_LEN} characters of ingredients"
            )));
        }

        let structured = StructuredRequest::new(
            prompts::recipe_suggestions_prompt(request),
            schema::recipe_suggestions(),
        );
        let output = self
            .backend
            .generate_structured(&structured)
            .await?
            .ok_or_else(|| AppError::generation_failed("Unable to generate recipes."))?;

        let recipes = Self::validate(output)?;
        info!(count = recipes.len(), "Recipe suggestions generated");

        self.attach_images(recipes).await
    }

    /// Strictly decode the model answer
    fn validate(output: serde_json::Value) -> AppResult<Vec<RecipeSuggestion>> {
        let GeneratedRecipes { recipes } = serde_json::from_value(output).map_err(|e| {
            warn!(error = %e, "Malformed recipe output");
            AppError::generation_failed("Unable to generate recipes.")
        })?;

        if recipes.len() != RECIPE_COUNT {
            warn!(count = recipes.len(), "Unexpected number of recipes");
            return Err(AppError::generation_failed(format!(
                "Expected {RECIPE_COUNT} recipes but the model returned {}.",
                recipes.len()
            )));
        }
        if let Some(incomplete) = recipes.iter().find(|r| !r.is_complete()) {
            warn!(name = %incomplete.name, "Incomplete recipe in model output");
            return Err(AppError::generation_failed(
                "The model returned an incomplete recipe.",
            ));
        }

        // Images are always generated by us, never taken from the text model
        Ok(recipes
            .into_iter()
            .map(|recipe| RecipeSuggestion {
                image_url: None,
                ..recipe
            })
            .collect())
    }

    /// Generate one image per recipe with at most `image_concurrency` calls in flight
    async fn attach_images(
        &self,
        recipes: Vec<RecipeSuggestion>,
    ) -> AppResult<Vec<RecipeSuggestion>> {
        let names: Vec<String> = recipes.iter().map(|r| r.name.clone()).collect();
        let generator = self.images.clone();
        let images: Vec<_> = stream::iter(names)
            .map(move |name| {
                let images = generator.clone();
                async move { images.generate(&name).await }
            })
            .buffered(self.image_concurrency)
            .collect()
            .await;

        recipes
            .into_iter()
            .zip(images)
            .map(|(recipe, image)| match (image, self.image_policy) {
                (Ok(image), _) => Ok(RecipeSuggestion {
                    image_url: Some(image.image_url),
                    ..recipe
                }),
                (Err(e), ImagePolicy::AllOrNothing) => Err(e),
                (Err(e), ImagePolicy::BestEffort) => {
                    warn!(
                        recipe = %recipe.name,
                        error = %e,
                        "Image generation failed, keeping recipe without image"
                    );
                    Ok(recipe)
                }
            })
            .collect()
    }
}
