// ABOUTME: Ingredient substitution advice for the ingredients a cook is missing
// ABOUTME: Guarantees the result holds exactly one entry per requested missing ingredient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{instrument, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, schema, GenerativeBackend, StructuredRequest};
use crate::models::{normalize_ingredient_names, SubstitutionRequest, SubstitutionResult};

#[derive(Debug, Deserialize)]
struct RawSubstitutions {
    substitutions: BTreeMap<String, Option<String>>,
}

/// Suggests replacements for missing ingredients from what is available
#[derive(Clone)]
pub struct SubstitutionAdvisor {
    backend: Arc<dyn GenerativeBackend>,
}

impl SubstitutionAdvisor {
    /// Create an advisor
    #[must_use]
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Suggest substitutes for each missing ingredient
    ///
    /// The returned map's keys are exactly the normalized missing ingredients.
    /// An empty value means the model found no good substitute.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank recipe name or no missing ingredients,
    /// and `GenerationFailed` if the model returns no usable output.
    #[instrument(skip(self, request), fields(recipe = %request.recipe_name, missing = request.missing_ingredients.len()))]
    pub async fn suggest(&self, request: &SubstitutionRequest) -> AppResult<SubstitutionResult> {
        let recipe_name = request.recipe_name.trim();
        if recipe_name.is_empty() {
            return Err(AppError::invalid_input("Recipe name is required"));
        }
        let missing = normalize_ingredient_names(&request.missing_ingredients);
        if missing.is_empty() {
            return Err(AppError::invalid_input(
                "Select at least one missing ingredient",
            ));
        }
        let available = normalize_ingredient_names(&request.available_ingredients);

        let structured = StructuredRequest::new(
            prompts::ingredient_substitution_prompt(recipe_name, &missing, &available),
            schema::ingredient_substitutions(&missing),
        );
        let output = self
            .backend
            .generate_structured(&structured)
            .await?
            .ok_or_else(|| AppError::generation_failed("Failed to get substitutions."))?;

        let RawSubstitutions { mut substitutions } =
            serde_json::from_value(output).map_err(|e| {
                warn!(error = %e, "Malformed substitution output");
                AppError::generation_failed("Failed to get substitutions.")
            })?;

        // Exact keys first, then the model's casing and padding are forgiven
        let mut result: BTreeMap<String, String> = BTreeMap::new();
        for name in &missing {
            if let Some(value) = substitutions.remove(name) {
                result.insert(name.clone(), clean_suggestion(value));
            }
        }
        for name in &missing {
            if result.contains_key(name) {
                continue;
            }
            let wanted = fold_key(name);
            let matched = substitutions.keys().find(|k| fold_key(k) == wanted).cloned();
            let value = matched.and_then(|key| substitutions.remove(&key)).flatten();
            result.insert(name.clone(), clean_suggestion(value));
        }

        if !substitutions.is_empty() {
            warn!(
                extra = ?substitutions.keys().collect::<Vec<_>>(),
                "Dropping substitutions for ingredients that were not requested"
            );
        }

        Ok(SubstitutionResult {
            substitutions: result,
        })
    }
}

/// Comparison key for model-returned ingredient names
fn fold_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn clean_suggestion(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::errors::ErrorCode;
    use crate::test_utils::ScriptedBackend;

    fn request(missing: &[&str], available: &[&str]) -> SubstitutionRequest {
        SubstitutionRequest {
            recipe_name: "Banana Pancakes".to_owned(),
            missing_ingredients: missing.iter().map(|s| (*s).to_owned()).collect(),
            available_ingredients: available.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[tokio::test]
    async fn test_eggs_example() {
        let backend = Arc::new(ScriptedBackend::new().with_structured(json!({
            "substitutions": {"eggs": "applesauce, mashed banana"}
        })));
        let result = SubstitutionAdvisor::new(backend.clone())
            .suggest(&request(&["eggs"], &["applesauce", "mashed banana"]))
            .await
            .unwrap();

        assert_eq!(result.substitutions.len(), 1);
        assert_eq!(
            result.suggestions_for("eggs"),
            vec!["applesauce", "mashed banana"]
        );

        let sent = &backend.structured_requests()[0];
        assert!(sent.prompt.contains("Available Ingredients: applesauce, mashed banana"));
    }

    #[tokio::test]
    async fn test_keys_match_requested_set_exactly() {
        let backend = Arc::new(ScriptedBackend::new().with_structured(json!({
            "substitutions": {"eggs": "flax egg", "sugar": "honey", "milk": null}
        })));
        let result = SubstitutionAdvisor::new(backend)
            .suggest(&request(&["eggs", " milk ", "butter", "eggs"], &[]))
            .await
            .unwrap();

        let keys: Vec<_> = result.substitutions.keys().cloned().collect();
        assert_eq!(keys, vec!["butter", "eggs", "milk"]);
        assert_eq!(result.substitutions["butter"], "");
        assert_eq!(result.substitutions["milk"], "");
        assert_eq!(result.substitutions["eggs"], "flax egg");
    }

    #[tokio::test]
    async fn test_model_key_casing_and_padding_are_forgiven() {
        let backend = Arc::new(ScriptedBackend::new().with_structured(json!({
            "substitutions": {"Eggs": "flax egg", " butter ": "coconut oil", "Milk": "oat milk"}
        })));
        let result = SubstitutionAdvisor::new(backend)
            .suggest(&request(&["eggs", "butter", "vanilla"], &[]))
            .await
            .unwrap();

        let keys: Vec<_> = result.substitutions.keys().cloned().collect();
        assert_eq!(keys, vec!["butter", "eggs", "vanilla"]);
        assert_eq!(result.substitutions["eggs"], "flax egg");
        assert_eq!(result.substitutions["butter"], "coconut oil");
        assert_eq!(result.substitutions["vanilla"], "");
    }

    #[tokio::test]
    async fn test_exact_key_preferred_over_folded_match() {
        let backend = Arc::new(ScriptedBackend::new().with_structured(json!({
            "substitutions": {"EGGS": "aquafaba", "eggs": "flax egg"}
        })));
        let result = SubstitutionAdvisor::new(backend)
            .suggest(&request(&["eggs"], &[]))
            .await
            .unwrap();

        assert_eq!(result.substitutions["eggs"], "flax egg");
    }

    #[tokio::test]
    async fn test_empty_missing_set_rejected() {
        let backend = Arc::new(ScriptedBackend::new());
        let err = SubstitutionAdvisor::new(backend.clone())
            .suggest(&request(&["  "], &["flour"]))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(backend.structured_calls(), 0);
    }

    #[tokio::test]
    async fn test_absent_output_fails() {
        let err = SubstitutionAdvisor::new(Arc::new(ScriptedBackend::new()))
            .suggest(&request(&["eggs"], &[]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GenerationFailed);
    }
}
