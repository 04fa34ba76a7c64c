// ABOUTME: Response schemas declared to the model for structured JSON output
// ABOUTME: Uses the OpenAPI subset accepted by Gemini's responseSchema field
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Output shapes for structured generation.
//!
//! The schema only guides the model. Responses are still decoded into typed
//! structs and checked by the calling service.

use serde_json::{json, Map, Value};

/// `{ recipes: [{ name, ingredients, instructions }] }`
#[must_use]
pub fn recipe_suggestions() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recipes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {"type": "STRING", "description": "The name of the recipe."},
                        "ingredients": {"type": "STRING", "description": "Comma-separated list of ingredients required for the recipe."},
                        "instructions": {"type": "STRING", "description": "Step-by-step instructions, one step per line."}
                    },
                    "required": ["name", "ingredients", "instructions"]
                }
            }
        },
        "required": ["recipes"]
    })
}

/// `{ substitutions: { <missing>: string, ... } }` with one required key per missing ingredient
#[must_use]
pub fn ingredient_substitutions(missing: &[String]) -> Value {
    let properties: Map<String, Value> = missing
        .iter()
        .map(|name| {
            (
                name.clone(),
                json!({
                    "type": "STRING",
                    "description": format!("Comma-separated substitutes for {name}, or an empty string.")
                }),
            )
        })
        .collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "substitutions": {
                "type": "OBJECT",
                "properties": properties,
                "required": missing
            }
        },
        "required": ["substitutions"]
    })
}

/// `{ calories, protein, carbs, fat }`
#[must_use]
pub fn macro_estimate() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "calories": {"type": "NUMBER", "description": "Estimated calories (kcal) per serving."},
            "protein": {"type": "NUMBER", "description": "Estimated protein in grams per serving."},
            "carbs": {"type": "NUMBER", "description": "Estimated carbohydrates in grams per serving."},
            "fat": {"type": "NUMBER", "description": "Estimated fat in grams per serving."}
        },
        "required": ["calories", "protein", "carbs", "fat"]
    })
}

/// `{ ingredients: string }`
#[must_use]
pub fn detected_ingredients() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ingredients": {"type": "STRING", "description": "Comma-separated list of ingredients heard in the recording."}
        },
        "required": ["ingredients"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution_schema_has_one_key_per_missing_ingredient() {
        let schema = ingredient_substitutions(&["eggs".to_owned(), "butter".to_owned()]);
        let inner = &schema["properties"]["substitutions"];

        assert_eq!(inner["properties"].as_object().map(Map::len), Some(2));
        assert_eq!(inner["properties"]["eggs"]["type"], "STRING");
        assert_eq!(inner["required"], json!(["eggs", "butter"]));
    }

    #[test]
    fn test_recipe_schema_requires_all_fields() {
        let schema = recipe_suggestions();
        assert_eq!(
            schema["properties"]["recipes"]["items"]["required"],
            json!(["name", "ingredients", "instructions"])
        );
    }
}
