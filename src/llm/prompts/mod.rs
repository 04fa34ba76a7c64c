// ABOUTME: Prompt templates for the kitchen services loaded at compile time
// ABOUTME: Renders recipe, substitution, macro, image and voice-input prompts from typed requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! Prompt text lives in markdown files next to this module so it can be
//! edited without touching code. Templates use `{{name}}` placeholders that
//! are filled by the `*_prompt` functions below.

use crate::constants::limits::RECIPE_COUNT;
use crate::models::{non_blank, MacroRequest, RecipeSuggestionRequest};

/// Recipe suggestion template
pub const RECIPE_SUGGESTIONS_TEMPLATE: &str = include_str!("recipe_suggestions.md");

/// Ingredient substitution template
pub const INGREDIENT_SUBSTITUTION_TEMPLATE: &str = include_str!("ingredient_substitution.md");

/// Macro estimate template
pub const MACRO_ESTIMATE_TEMPLATE: &str = include_str!("macro_estimate.md");

/// Voice-input ingredient detection prompt (the clip is attached as media)
pub const INGREDIENT_DETECTION_PROMPT: &str = include_str!("ingredient_detection.md");

/// Replace each `{{key}}` in `template` with its value in a single pass
///
/// Substituted values are never rescanned, so user text that happens to
/// contain `{{...}}` stays literal. Unknown placeholders are left as written.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            rest = &rest[open..];
            break;
        };

        let key = &after_open[..close];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    out
}

/// Prompt asking for recipe suggestions
///
/// The dietary restriction and cuisine preference lines are only included
/// when the request carries non-blank values for them.
#[must_use]
pub fn recipe_suggestions_prompt(request: &RecipeSuggestionRequest) -> String {
    let mut constraints = String::new();
    if let Some(restrictions) = non_blank(request.dietary_restrictions.as_deref()) {
        constraints.push_str(&format!("\nDietary Restrictions: {restrictions}\n"));
    }
    if let Some(preferences) = non_blank(request.preferences.as_deref()) {
        constraints.push_str(&format!("\nCuisine Preferences: {preferences}\n"));
    }

    render(
        RECIPE_SUGGESTIONS_TEMPLATE,
        &[
            ("ingredients", request.ingredients.trim()),
            ("constraints", &constraints),
            ("recipe_count", &RECIPE_COUNT.to_string()),
        ],
    )
}

/// Prompt asking for substitutes for each missing ingredient
#[must_use]
pub fn ingredient_substitution_prompt(
    recipe_name: &str,
    missing: &[String],
    available: &[String],
) -> String {
    render(
        INGREDIENT_SUBSTITUTION_TEMPLATE,
        &[
            ("recipe_name", recipe_name.trim()),
            ("missing_ingredients", &missing.join(", ")),
            ("available_ingredients", &available.join(", ")),
        ],
    )
}

/// Prompt asking for a per-serving nutrition estimate
#[must_use]
pub fn macro_estimate_prompt(request: &MacroRequest) -> String {
    render(
        MACRO_ESTIMATE_TEMPLATE,
        &[
            ("recipe_name", request.recipe_name.trim()),
            ("ingredients", request.ingredients.trim()),
        ],
    )
}

/// Photography prompt for a recipe picture
#[must_use]
pub fn recipe_image_prompt(recipe_name: &str) -> String {
    format!(
        "A delicious-looking, professionally photographed image of \"{}\", presented on a clean plate, with a blurred, warm kitchen background.",
        recipe_name.trim()
    )
}
