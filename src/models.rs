// ABOUTME: Request and result records exchanged with the kitchen services
// ABOUTME: Recipe suggestions, substitutions, macro estimates, narration and generated images
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Data models for the kitchen services.
//!
//! All records are plain values created per request. Only
//! [`RecipeSuggestion`] outlives a request, as a favorite.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Split comma-separated free text into trimmed, non-empty items
#[must_use]
pub fn split_ingredient_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Trim, drop blanks and de-duplicate a list of ingredient names, keeping first-seen order
#[must_use]
pub fn normalize_ingredient_names(names: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert((*name).to_owned()))
        .map(str::to_owned)
        .collect()
}

/// Treat blank optional text as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Ingredients and optional constraints for recipe generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeSuggestionRequest {
    /// Free-text, usually comma-separated, list of available ingredients
    pub ingredients: String,
    /// Dietary restrictions such as "vegetarian, gluten-free"
    #[serde(default, alias = "dietaryRestrictions")]
    pub dietary_restrictions: Option<String>,
    /// Cuisine preferences such as "Italian, spicy"
    #[serde(default)]
    pub preferences: Option<String>,
}

impl RecipeSuggestionRequest {
    /// Request with just an ingredient list
    #[must_use]
    pub fn new(ingredients: impl Into<String>) -> Self {
        Self {
            ingredients: ingredients.into(),
            ..Self::default()
        }
    }

    /// Add dietary restrictions
    #[must_use]
    pub fn with_dietary_restrictions(mut self, restrictions: impl Into<String>) -> Self {
        self.dietary_restrictions = Some(restrictions.into());
        self
    }

    /// Add cuisine preferences
    #[must_use]
    pub fn with_preferences(mut self, preferences: impl Into<String>) -> Self {
        self.preferences = Some(preferences.into());
        self
    }
}

/// One generated recipe
///
/// Identity is the exact `name`; favorites never hold two recipes with the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    /// Recipe name
    pub name: String,
    /// Comma-separated ingredient list
    pub ingredients: String,
    /// Preparation instructions, one step per line
    pub instructions: String,
    /// Generated image as a data URI
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl RecipeSuggestion {
    /// Individual ingredients parsed from the comma-separated field
    #[must_use]
    pub fn ingredient_list(&self) -> Vec<String> {
        split_ingredient_list(&self.ingredients)
    }

    /// Non-blank instruction lines
    #[must_use]
    pub fn instruction_steps(&self) -> Vec<String> {
        self.instructions
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Whether name, ingredients and instructions are all present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.ingredients.trim().is_empty()
            && !self.instructions.trim().is_empty()
    }
}

/// Inputs for the substitution advisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionRequest {
    /// Recipe being cooked
    #[serde(alias = "recipeName")]
    pub recipe_name: String,
    /// Ingredients the cook does not have
    #[serde(alias = "missingIngredients")]
    pub missing_ingredients: Vec<String>,
    /// Ingredients the cook does have
    #[serde(default, alias = "availableIngredients")]
    pub available_ingredients: Vec<String>,
}

/// Missing ingredient → comma-joined substitutes (`""` means no good substitute)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionResult {
    /// One entry per requested missing ingredient
    pub substitutions: BTreeMap<String, String>,
}

impl SubstitutionResult {
    /// Substitutes for one missing ingredient, split into items
    #[must_use]
    pub fn suggestions_for(&self, ingredient: &str) -> Vec<String> {
        self.substitutions
            .get(ingredient)
            .map(|s| split_ingredient_list(s))
            .unwrap_or_default()
    }
}

/// Inputs for the macro estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroRequest {
    /// Recipe name
    #[serde(alias = "recipeName")]
    pub recipe_name: String,
    /// Comma-separated ingredient list
    pub ingredients: String,
}

/// Estimated nutrition for a single serving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroEstimate {
    /// Kilocalories
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
}

impl MacroEstimate {
    /// All four values are finite and non-negative
    #[must_use]
    pub fn is_plausible(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Synthesized speech for a block of instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioNarration {
    /// Playable audio as a data URI
    pub audio_data_uri: String,
}

/// Generated picture of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Image as a data URI
    pub image_url: String,
}

/// Voice clip listing ingredients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioClip {
    /// Recorded audio as a data URI
    #[serde(alias = "audioDataUri")]
    pub audio_data_uri: String,
}

/// Ingredients heard in a voice clip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedIngredients {
    /// Comma-separated ingredient list
    pub ingredients: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn recipe() -> RecipeSuggestion {
        RecipeSuggestion {
            name: "Chicken Rice Bowl".into(),
            ingredients: "chicken breast, tomato ,rice,, onion, garlic".into(),
            instructions: "Cook rice.\n\n  Sear chicken.\nCombine.\n".into(),
            image_url: None,
        }
    }

    #[test]
    fn test_ingredient_list_parsing() {
        assert_eq!(
            recipe().ingredient_list(),
            vec!["chicken breast", "tomato", "rice", "onion", "garlic"]
        );
    }

    #[test]
    fn test_instruction_steps_skip_blank_lines() {
        assert_eq!(
            recipe().instruction_steps(),
            vec!["Cook rice.", "Sear chicken.", "Combine."]
        );
    }

    #[test]
    fn test_normalize_ingredient_names() {
        let names = vec![
            " eggs ".to_owned(),
            String::new(),
            "milk".to_owned(),
            "eggs".to_owned(),
        ];
        assert_eq!(normalize_ingredient_names(&names), vec!["eggs", "milk"]);
    }

    #[test]
    fn test_legacy_camel_case_fields_accepted() {
        let recipe: RecipeSuggestion = serde_json::from_str(
            r#"{"name":"Soup","ingredients":"water","instructions":"Boil","imageUrl":"data:image/png;base64,AA"}"#,
        )
        .unwrap();
        assert_eq!(recipe.image_url.as_deref(), Some("data:image/png;base64,AA"));
    }

    #[test]
    fn test_macro_plausibility() {
        let ok = MacroEstimate {
            calories: 520.0,
            protein: 35.0,
            carbs: 60.0,
            fat: 12.5,
        };
        assert!(ok.is_plausible());
        assert!(!MacroEstimate {
            calories: -1.0,
            ..ok
        }
        .is_plausible());
        assert!(!MacroEstimate {
            fat: f64::NAN,
            ..ok
        }
        .is_plausible());
    }
}
