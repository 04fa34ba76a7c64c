// ABOUTME: Per-serving nutrition estimate (calories, protein, carbs, fat) for a recipe
// ABOUTME: Decodes the model answer into typed numbers and rejects implausible values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, schema, GenerativeBackend, StructuredRequest};
use crate::models::{MacroEstimate, MacroRequest};

const FAILURE_MESSAGE: &str = "Failed to calculate macros.";

/// Estimates macronutrients; results are advisory
#[derive(Clone)]
pub struct MacroEstimator {
    backend: Arc<dyn GenerativeBackend>,
}

impl MacroEstimator {
    /// Create an estimator
    #[must_use]
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Estimate nutrition for one serving
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name or ingredient list, and
    /// `GenerationFailed` if the model returns no output or non-numeric,
    /// negative or non-finite values.
    #[instrument(skip(self, request), fields(recipe = %request.recipe_name))]
    pub async fn estimate(&self, request: &MacroRequest) -> AppResult<MacroEstimate> {
        if request.recipe_name.trim().is_empty() || request.ingredients.trim().is_empty() {
            return Err(AppError::invalid_input(
                "Recipe name and ingredients are required",
            ));
        }

        let structured = StructuredRequest::new(
            prompts::macro_estimate_prompt(request),
            schema::macro_estimate(),
        );
        let output = self
            .backend
            .generate_structured(&structured)
            .await?
            .ok_or_else(|| AppError::generation_failed(FAILURE_MESSAGE))?;

        let estimate: MacroEstimate = serde_json::from_value(output).map_err(|e| {
            warn!(error = %e, "Malformed macro output");
            AppError::generation_failed(FAILURE_MESSAGE)
        })?;

        if !estimate.is_plausible() {
            warn!(?estimate, "Implausible macro values");
            return Err(AppError::generation_failed(FAILURE_MESSAGE));
        }
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::errors::ErrorCode;
    use crate::test_utils::ScriptedBackend;

    fn request() -> MacroRequest {
        MacroRequest {
            recipe_name: "Chicken Tomato Rice".to_owned(),
            ingredients: "chicken breast, tomato, rice".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_estimate_decodes_numbers() {
        let backend = Arc::new(ScriptedBackend::new().with_structured(json!({
            "calories": 540, "protein": 38.5, "carbs": 62, "fat": 11.2
        })));
        let estimate = MacroEstimator::new(backend).estimate(&request()).await.unwrap();

        assert!((estimate.calories - 540.0).abs() < f64::EPSILON);
        assert!((estimate.fat - 11.2).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_non_numeric_output_fails() {
        let backend = Arc::new(ScriptedBackend::new().with_structured(json!({
            "calories": "lots", "protein": 1, "carbs": 1, "fat": 1
        })));
        let err = MacroEstimator::new(backend)
            .estimate(&request())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GenerationFailed);
    }

    #[tokio::test]
    async fn test_negative_values_fail() {
        let backend = Arc::new(ScriptedBackend::new().with_structured(json!({
            "calories": 200, "protein": -3, "carbs": 10, "fat": 1
        })));
        let err = MacroEstimator::new(backend)
            .estimate(&request())
            .await
            .unwrap_err();
        assert_eq!(err.message, "Failed to calculate macros.");
    }
}
