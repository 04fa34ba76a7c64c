// ABOUTME: Persisted favorite recipes keyed by exact recipe name
// ABOUTME: Versioned JSON file with legacy migration, atomic writes and change notifications
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Favorites Store
//!
//! Favorites are kept in a single JSON document:
//!
//! ```json
//! { "version": 1, "favorites": [ { "name": "...", "ingredients": "...", "instructions": "..." } ] }
//! ```
//!
//! Files written before versioning hold a bare array of recipes. They are
//! read as version 0 and rewritten in the current format on first load.
//!
//! Every change is broadcast as a [`FavoritesEvent`] so other consumers
//! (open views, connected clients) can refresh.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::constants::storage::{FAVORITES_EVENT_CAPACITY, FAVORITES_SCHEMA_VERSION};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::RecipeSuggestion;

/// On-disk document
#[derive(Debug, Serialize, Deserialize)]
struct FavoritesFile {
    version: u32,
    #[serde(default)]
    favorites: Vec<RecipeSuggestion>,
}

/// Kind of favorites change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoritesChange {
    /// A recipe was added
    Added,
    /// A recipe was removed
    Removed,
}

impl FavoritesChange {
    /// Lowercase label used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

/// Change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesEvent {
    /// What happened
    pub change: FavoritesChange,
    /// Recipe name affected
    pub name: String,
    /// Number of favorites after the change
    pub total: usize,
    /// When the change was persisted
    pub at: DateTime<Utc>,
}

/// File-backed favorites list
pub struct FavoritesStore {
    path: PathBuf,
    favorites: Mutex<Vec<RecipeSuggestion>>,
    events: broadcast::Sender<FavoritesEvent>,
}

impl FavoritesStore {
    /// Open the store at `path`, migrating legacy files
    ///
    /// A missing file is an empty list; it is created on the first change.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be read, is not valid JSON,
    /// or was written by a newer schema version.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let (favorites, migrated) = match fs::read_to_string(&path).await {
            Ok(contents) => Self::decode(&path, &contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No favorites file yet");
                (Vec::new(), false)
            }
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to read favorites file {}: {e}",
                    path.display()
                )))
            }
        };

        if migrated {
            write_atomically(&path, &favorites).await?;
            info!(
                path = %path.display(),
                count = favorites.len(),
                "Migrated favorites to schema version {FAVORITES_SCHEMA_VERSION}"
            );
        }

        let (events, _) = broadcast::channel(FAVORITES_EVENT_CAPACITY);
        Ok(Self {
            path,
            favorites: Mutex::new(favorites),
            events,
        })
    }

    /// Decode file contents, returning the favorites and whether they were migrated
    fn decode(path: &Path, contents: &str) -> AppResult<(Vec<RecipeSuggestion>, bool)> {
        let corrupt = |e: serde_json::Error| {
            AppError::storage(format!(
                "Favorites file {} is corrupt: {e}",
                path.display()
            ))
        };

        if contents.trim().is_empty() {
            return Ok((Vec::new(), false));
        }

        let value: Value = serde_json::from_str(contents).map_err(corrupt)?;
        match value {
            Value::Array(_) => {
                let legacy: Vec<RecipeSuggestion> = serde_json::from_value(value).map_err(corrupt)?;
                Ok((dedupe_by_name(legacy), true))
            }
            Value::Object(_) => {
                let file: FavoritesFile = serde_json::from_value(value).map_err(corrupt)?;
                match file.version {
                    v if v > FAVORITES_SCHEMA_VERSION => Err(AppError::storage(format!(
                        "Favorites file {} has schema version {v}, newer than supported version {FAVORITES_SCHEMA_VERSION}",
                        path.display()
                    ))),
                    FAVORITES_SCHEMA_VERSION => Ok((file.favorites, false)),
                    _ => Ok((dedupe_by_name(file.favorites), true)),
                }
            }
            _ => Err(AppError::storage(format!(
                "Favorites file {} has an unexpected layout",
                path.display()
            ))),
        }
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subscribe to change notifications
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesEvent> {
        self.events.subscribe()
    }

    /// Current favorites in insertion order
    pub async fn list(&self) -> Vec<RecipeSuggestion> {
        self.favorites.lock().await.clone()
    }

    /// Whether a recipe with exactly this name is a favorite
    pub async fn is_favorite(&self, name: &str) -> bool {
        self.favorites.lock().await.iter().any(|r| r.name == name)
    }

    /// Add a recipe; returns `false` if one with the same name already exists
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be written.
    pub async fn add(&self, recipe: RecipeSuggestion) -> AppResult<bool> {
        let mut favorites = self.favorites.lock().await;
        if favorites.iter().any(|r| r.name == recipe.name) {
            return Ok(false);
        }
        let name = recipe.name.clone();
        let mut updated = favorites.clone();
        updated.push(recipe);
        self.commit(&mut favorites, updated, FavoritesChange::Added, name)
            .await?;
        Ok(true)
    }

    /// Remove by name; returns `false` if no such favorite existed
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be written.
    pub async fn remove(&self, name: &str) -> AppResult<bool> {
        let mut favorites = self.favorites.lock().await;
        if !favorites.iter().any(|r| r.name == name) {
            return Ok(false);
        }
        let updated = without(&favorites, name);
        self.commit(&mut favorites, updated, FavoritesChange::Removed, name.to_owned())
            .await?;
        Ok(true)
    }

    /// Add the recipe if absent, remove it if present
    ///
    /// Returns whether the recipe is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be written.
    pub async fn toggle(&self, recipe: RecipeSuggestion) -> AppResult<bool> {
        let mut favorites = self.favorites.lock().await;
        if favorites.iter().any(|r| r.name == recipe.name) {
            let updated = without(&favorites, &recipe.name);
            self.commit(&mut favorites, updated, FavoritesChange::Removed, recipe.name)
                .await?;
            return Ok(false);
        }
        let name = recipe.name.clone();
        let mut updated = favorites.clone();
        updated.push(recipe);
        self.commit(&mut favorites, updated, FavoritesChange::Added, name)
            .await?;
        Ok(true)
    }

    /// Persist `updated`, then swap it in and notify subscribers
    async fn commit(
        &self,
        current: &mut Vec<RecipeSuggestion>,
        updated: Vec<RecipeSuggestion>,
        change: FavoritesChange,
        name: String,
    ) -> AppResult<()> {
        write_atomically(&self.path, &updated).await?;
        *current = updated;

        let event = FavoritesEvent {
            change,
            name,
            total: current.len(),
            at: Utc::now(),
        };
        AppLogger::log_favorites_event(event.change.as_str(), &event.name, event.total);
        // No subscribers is fine
        let _ = self.events.send(event);
        Ok(())
    }
}

fn without(favorites: &[RecipeSuggestion], name: &str) -> Vec<RecipeSuggestion> {
    favorites.iter().filter(|r| r.name != name).cloned().collect()
}

/// Keep the first recipe for each name
fn dedupe_by_name(recipes: Vec<RecipeSuggestion>) -> Vec<RecipeSuggestion> {
    let mut kept: Vec<RecipeSuggestion> = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        if kept.iter().any(|r| r.name == recipe.name) {
            warn!(name = %recipe.name, "Dropping duplicate favorite");
        } else {
            kept.push(recipe);
        }
    }
    kept
}

/// Write the current-version document via a temp file and rename
async fn write_atomically(path: &Path, favorites: &[RecipeSuggestion]) -> AppResult<()> {
    #[derive(Serialize)]
    struct FavoritesFileRef<'a> {
        version: u32,
        favorites: &'a [RecipeSuggestion],
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::storage(format!(
                "Failed to create favorites directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let body = serde_json::to_vec_pretty(&FavoritesFileRef {
        version: FAVORITES_SCHEMA_VERSION,
        favorites,
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, body).await.map_err(|e| {
        AppError::storage(format!("Failed to write {}: {e}", tmp.display()))
    })?;
    fs::rename(&tmp, path).await.map_err(|e| {
        AppError::storage(format!("Failed to replace {}: {e}", path.display()))
    })?;
    Ok(())
}
