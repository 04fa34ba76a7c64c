// ABOUTME: Kitchen service layer wrapping each generative round trip behind a typed API
// ABOUTME: Protocol-agnostic; used by the HTTP routes and the recipe detail views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Kitchen service layer
//!
//! Each service is structurally the same: validate input, render a prompt,
//! make one backend call, strictly decode the answer. None of them retry.

/// Per-recipe picture generation
pub mod images;

/// Voice-input ingredient detection
pub mod ingredient_detection;

/// Nutrition estimates
pub mod macros;

/// Speech synthesis of instructions
pub mod narration;

/// Recipe suggestions with image fan-out
pub mod recipe_generator;

/// Ingredient substitution advice
pub mod substitution;

use std::sync::Arc;

pub use images::ImageGenerator;
pub use ingredient_detection::IngredientDetector;
pub use macros::MacroEstimator;
pub use narration::AudioNarrator;
pub use recipe_generator::{ImagePolicy, RecipeGenerator};
pub use substitution::SubstitutionAdvisor;

use crate::llm::GenerativeBackend;

/// All kitchen services sharing one backend
#[derive(Clone)]
pub struct KitchenServices {
    /// Recipe suggestions
    pub recipes: RecipeGenerator,
    /// Substitution advice
    pub substitutions: SubstitutionAdvisor,
    /// Instruction narration
    pub narrator: AudioNarrator,
    /// Nutrition estimates
    pub macros: MacroEstimator,
    /// Recipe pictures
    pub images: ImageGenerator,
    /// Voice-input detection
    pub ingredients: IngredientDetector,
}

impl KitchenServices {
    /// Build every service on top of `backend`
    #[must_use]
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        image_concurrency: usize,
        image_policy: ImagePolicy,
    ) -> Self {
        Self {
            recipes: RecipeGenerator::new(backend.clone(), image_concurrency, image_policy),
            substitutions: SubstitutionAdvisor::new(backend.clone()),
            narrator: AudioNarrator::new(backend.clone()),
            macros: MacroEstimator::new(backend.clone()),
            images: ImageGenerator::new(backend.clone()),
            ingredients: IngredientDetector::new(backend),
        }
    }
}
