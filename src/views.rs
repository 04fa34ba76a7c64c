// ABOUTME: Recipe detail view sessions holding a per-view cached macro estimate
// ABOUTME: Registry of open views keyed by id; closing or idling out a view drops its cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Detail view sessions.
//!
//! A view exists from the moment a user opens a recipe until they close it
//! or leave it idle longer than the registry's idle TTL. Macros are computed
//! at most once per view; narration is not cached.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::limits::{VIEW_CLEANUP_THRESHOLD, VIEW_IDLE_TTL_SECS};
use crate::errors::{AppError, AppResult};
use crate::models::{
    normalize_ingredient_names, AudioNarration, MacroEstimate, MacroRequest, RecipeSuggestion,
    SubstitutionRequest, SubstitutionResult,
};
use crate::services::KitchenServices;

/// One open recipe detail view
#[derive(Debug)]
pub struct RecipeView {
    id: Uuid,
    recipe: RecipeSuggestion,
    available_ingredients: Vec<String>,
    opened_at: DateTime<Utc>,
    macros: OnceCell<MacroEstimate>,
}

/// Serializable snapshot of a view
#[derive(Debug, Clone, Serialize)]
pub struct RecipeViewDetail {
    /// View id
    pub view_id: Uuid,
    /// The recipe shown
    pub recipe: RecipeSuggestion,
    /// Parsed ingredients
    pub ingredient_list: Vec<String>,
    /// Parsed instruction steps
    pub steps: Vec<String>,
    /// Ingredients the cook said they have
    pub available_ingredients: Vec<String>,
    /// Cached macros, if already computed
    pub macros: Option<MacroEstimate>,
    /// When the view was opened
    pub opened_at: DateTime<Utc>,
}

impl RecipeView {
    /// Open a view on `recipe`
    #[must_use]
    pub fn new(recipe: RecipeSuggestion, available_ingredients: &[String]) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipe,
            available_ingredients: normalize_ingredient_names(available_ingredients),
            opened_at: Utc::now(),
            macros: OnceCell::new(),
        }
    }

    /// View id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The recipe shown
    #[must_use]
    pub const fn recipe(&self) -> &RecipeSuggestion {
        &self.recipe
    }

    /// Macros if they have already been computed
    #[must_use]
    pub fn cached_macros(&self) -> Option<MacroEstimate> {
        self.macros.get().copied()
    }

    /// Macro estimate for this recipe, computed on first request
    ///
    /// Concurrent first requests share one backend call. A failed call
    /// leaves the cache empty so the user can try again.
    ///
    /// # Errors
    ///
    /// Propagates the estimator error.
    pub async fn macros(&self, services: &KitchenServices) -> AppResult<MacroEstimate> {
        let estimate = self
            .macros
            .get_or_try_init(|| async {
                debug!(view_id = %self.id, "Computing macros for view");
                services
                    .macros
                    .estimate(&MacroRequest {
                        recipe_name: self.recipe.name.clone(),
                        ingredients: self.recipe.ingredients.clone(),
                    })
                    .await
            })
            .await?;
        Ok(*estimate)
    }

    /// Narrate this recipe's instructions (never cached)
    ///
    /// # Errors
    ///
    /// Propagates the narrator error.
    pub async fn narrate(&self, services: &KitchenServices) -> AppResult<AudioNarration> {
        services.narrator.narrate(&self.recipe.instructions).await
    }

    /// Substitutes for ingredients of this recipe the cook is missing
    ///
    /// Missing items must come from the recipe's own ingredient list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if an item is not part of the recipe, otherwise
    /// propagates the advisor error.
    pub async fn substitutions(
        &self,
        services: &KitchenServices,
        missing: &[String],
    ) -> AppResult<SubstitutionResult> {
        let candidates: BTreeSet<String> = self.recipe.ingredient_list().into_iter().collect();
        let missing = normalize_ingredient_names(missing);
        if let Some(unknown) = missing.iter().find(|m| !candidates.contains(*m)) {
            return Err(AppError::invalid_input(format!(
                "'{unknown}' is not an ingredient of {}",
                self.recipe.name
            )));
        }

        services
            .substitutions
            .suggest(&SubstitutionRequest {
                recipe_name: self.recipe.name.clone(),
                missing_ingredients: missing,
                available_ingredients: self.available_ingredients.clone(),
            })
            .await
    }

    /// Snapshot for API responses
    #[must_use]
    pub fn detail(&self) -> RecipeViewDetail {
        RecipeViewDetail {
            view_id: self.id,
            recipe: self.recipe.clone(),
            ingredient_list: self.recipe.ingredient_list(),
            steps: self.recipe.instruction_steps(),
            available_ingredients: self.available_ingredients.clone(),
            macros: self.cached_macros(),
            opened_at: self.opened_at,
        }
    }
}

/// Registry slot: the view plus when a client last touched it
#[derive(Debug)]
struct ViewEntry {
    view: Arc<RecipeView>,
    last_seen: Instant,
}

/// Open views by id
///
/// Clients that navigate away without closing leave views behind, so views
/// idle for longer than `idle_ttl` are dropped lazily: on lookup, and in bulk
/// on `open` once the map grows past the cleanup threshold.
#[derive(Debug)]
pub struct ViewRegistry {
    views: DashMap<Uuid, ViewEntry>,
    idle_ttl: Duration,
    cleanup_threshold: usize,
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self {
            views: DashMap::new(),
            idle_ttl: Duration::from_secs(VIEW_IDLE_TTL_SECS),
            cleanup_threshold: VIEW_CLEANUP_THRESHOLD,
        }
    }
}

impl ViewRegistry {
    /// Empty registry with the default idle TTL
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override idle eviction: views untouched for `idle_ttl` expire, and a
    /// bulk sweep runs on `open` once `cleanup_threshold` views are held
    #[must_use]
    pub const fn with_idle_eviction(
        mut self,
        idle_ttl: Duration,
        cleanup_threshold: usize,
    ) -> Self {
        self.idle_ttl = idle_ttl;
        self.cleanup_threshold = cleanup_threshold;
        self
    }

    /// Open a view and return it
    pub fn open(
        &self,
        recipe: RecipeSuggestion,
        available_ingredients: &[String],
    ) -> Arc<RecipeView> {
        let now = Instant::now();
        if self.views.len() >= self.cleanup_threshold {
            self.evict_idle(now);
        }

        let view = Arc::new(RecipeView::new(recipe, available_ingredients));
        info!(view_id = %view.id, recipe = %view.recipe.name, "Recipe view opened");
        self.views.insert(
            view.id,
            ViewEntry {
                view: view.clone(),
                last_seen: now,
            },
        );
        view
    }

    /// Look up an open view and mark it as recently used
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no view has this id or it has idled out.
    pub fn get(&self, id: Uuid) -> AppResult<Arc<RecipeView>> {
        let now = Instant::now();
        if self
            .views
            .remove_if(&id, |_, entry| self.is_idle(entry, now))
            .is_some()
        {
            debug!(view_id = %id, "Recipe view expired");
            return Err(Self::missing(id));
        }

        let mut entry = self.views.get_mut(&id).ok_or_else(|| Self::missing(id))?;
        entry.last_seen = now;
        Ok(entry.view.clone())
    }

    /// Close a view, discarding its cache
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no view has this id.
    pub fn close(&self, id: Uuid) -> AppResult<()> {
        if self.views.remove(&id).is_none() {
            return Err(Self::missing(id));
        }
        info!(view_id = %id, "Recipe view closed");
        Ok(())
    }

    /// Number of open views
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether no views are open
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn is_idle(&self, entry: &ViewEntry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) >= self.idle_ttl
    }

    /// Drop every view idle past the TTL
    fn evict_idle(&self, now: Instant) {
        let before = self.views.len();
        self.views.retain(|_, entry| !self.is_idle(entry, now));
        let evicted = before.saturating_sub(self.views.len());
        if evicted > 0 {
            info!(evicted, remaining = self.views.len(), "Evicted idle recipe views");
        }
    }

    fn missing(id: Uuid) -> AppError {
        AppError::not_found(format!("Recipe view {id}"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::errors::ErrorCode;
    use crate::services::ImagePolicy;
    use crate::test_utils::{sample_recipe, ScriptedBackend};

    #[tokio::test]
    async fn test_macros_cached_per_view() {
        let backend = Arc::new(ScriptedBackend::new().with_structured(json!({
            "calories": 610, "protein": 42, "carbs": 70, "fat": 14
        })));
        let services = KitchenServices::new(backend.clone(), 3, ImagePolicy::AllOrNothing);
        let view = RecipeView::new(sample_recipe("Chicken Rice"), &[]);

        assert!(view.cached_macros().is_none());
        let first = view.macros(&services).await.unwrap();
        let second = view.macros(&services).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.structured_calls(), 1);
        assert_eq!(view.detail().macros, Some(first));
    }

    #[tokio::test]
    async fn test_substitution_candidates_limited_to_recipe() {
        let backend = Arc::new(ScriptedBackend::new());
        let services = KitchenServices::new(backend.clone(), 3, ImagePolicy::AllOrNothing);
        let view = RecipeView::new(sample_recipe("Chicken Rice"), &["quinoa".to_owned()]);

        let err = view
            .substitutions(&services, &["saffron".to_owned()])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(backend.structured_calls(), 0);
    }

    #[test]
    fn test_registry_close_forgets_view() {
        let registry = ViewRegistry::new();
        let view = registry.open(sample_recipe("Soup"), &[]);

        assert!(registry.get(view.id()).is_ok());
        registry.close(view.id()).unwrap();
        assert_eq!(
            registry.get(view.id()).unwrap_err().code,
            ErrorCode::ResourceNotFound
        );
        assert!(registry.close(view.id()).is_err());
    }

    #[test]
    fn test_idle_views_are_evicted_on_open() {
        let registry = ViewRegistry::new().with_idle_eviction(Duration::from_millis(50), 1);
        let stale = registry.open(sample_recipe("Soup"), &[]);

        std::thread::sleep(Duration::from_millis(80));
        let fresh = registry.open(sample_recipe("Stew"), &[]);

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(stale.id()).unwrap_err().code,
            ErrorCode::ResourceNotFound
        );
        assert!(registry.get(fresh.id()).is_ok());
    }

    #[test]
    fn test_idle_view_expires_on_lookup() {
        let registry =
            ViewRegistry::new().with_idle_eviction(Duration::from_millis(50), usize::MAX);
        let view = registry.open(sample_recipe("Soup"), &[]);

        std::thread::sleep(Duration::from_millis(80));

        assert_eq!(
            registry.get(view.id()).unwrap_err().code,
            ErrorCode::ResourceNotFound
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_keeps_view_alive() {
        let registry = ViewRegistry::new().with_idle_eviction(Duration::from_millis(300), 1);
        let view = registry.open(sample_recipe("Soup"), &[]);

        for _ in 0..4 {
            std::thread::sleep(Duration::from_millis(120));
            assert!(registry.get(view.id()).is_ok());
        }
        registry.open(sample_recipe("Stew"), &[]);
        assert_eq!(registry.len(), 2);
    }
}
