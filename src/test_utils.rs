// ABOUTME: Test utilities: a scripted in-process generative backend and sample recipe data
// ABOUTME: Lets service, view and route tests run without network access to Gemini
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::AppResult;
use crate::llm::{GenerativeBackend, StructuredRequest};
use crate::media::DataUri;
use crate::models::RecipeSuggestion;

/// Tiny valid PNG header used as a stand-in image payload
pub const TEST_IMAGE_BASE64: &str = "iVBORw0KGgo=";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Generative backend driven by a script instead of a model
///
/// Structured responses are served from a FIFO queue; when the queue is empty
/// the backend answers with "no output". Image prompts containing any of the
/// configured failure markers fail with `GenerationFailed`-style empty output.
#[derive(Default)]
pub struct ScriptedBackend {
    structured: Mutex<VecDeque<AppResult<Option<Value>>>>,
    structured_requests: Mutex<Vec<StructuredRequest>>,
    image_failures: Mutex<Vec<String>>,
    image_delay: Mutex<Option<Duration>>,
    speech: Mutex<Option<DataUri>>,
    structured_calls: AtomicUsize,
    image_calls: AtomicUsize,
    speech_calls: AtomicUsize,
    images_in_flight: AtomicUsize,
    max_images_in_flight: AtomicUsize,
    unhealthy: AtomicBool,
}

impl ScriptedBackend {
    /// Empty script: every call yields no output except images
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a structured JSON answer
    #[must_use]
    pub fn with_structured(self, value: Value) -> Self {
        lock(&self.structured).push_back(Ok(Some(value)));
        self
    }

    /// Queue a structured call that returns an error
    #[must_use]
    pub fn with_structured_error(self, error: crate::errors::AppError) -> Self {
        lock(&self.structured).push_back(Err(error));
        self
    }

    /// Make image prompts mentioning `marker` come back without an image
    #[must_use]
    pub fn with_image_failure(self, marker: impl Into<String>) -> Self {
        lock(&self.image_failures).push(marker.into());
        self
    }

    /// Hold each image call open for `delay` so concurrency can be observed
    #[must_use]
    pub fn with_image_delay(self, delay: Duration) -> Self {
        *lock(&self.image_delay) = Some(delay);
        self
    }

    /// Answer speech requests with `audio`
    #[must_use]
    pub fn with_speech(self, audio: DataUri) -> Self {
        *lock(&self.speech) = Some(audio);
        self
    }

    /// Report the backend as unreachable from `health_check`
    #[must_use]
    pub fn with_unhealthy(self) -> Self {
        self.unhealthy.store(true, Ordering::SeqCst);
        self
    }

    /// Number of structured generation calls received
    pub fn structured_calls(&self) -> usize {
        self.structured_calls.load(Ordering::SeqCst)
    }

    /// Number of image generation calls received
    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    /// Number of speech synthesis calls received
    pub fn speech_calls(&self) -> usize {
        self.speech_calls.load(Ordering::SeqCst)
    }

    /// Highest number of image calls observed running at once
    pub fn max_images_in_flight(&self) -> usize {
        self.max_images_in_flight.load(Ordering::SeqCst)
    }

    /// Structured requests received so far
    pub fn structured_requests(&self) -> Vec<StructuredRequest> {
        lock(&self.structured_requests).clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate_structured(&self, request: &StructuredRequest) -> AppResult<Option<Value>> {
        self.structured_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.structured_requests).push(request.clone());
        let next = lock(&self.structured).pop_front();
        next.unwrap_or(Ok(None))
    }

    async fn generate_image(&self, prompt: &str) -> AppResult<Option<DataUri>> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.images_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_images_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);

        let delay = *lock(&self.image_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.images_in_flight.fetch_sub(1, Ordering::SeqCst);

        let fails = lock(&self.image_failures)
            .iter()
            .any(|marker| prompt.contains(marker.as_str()));
        Ok((!fails).then(|| DataUri::new("image/png", TEST_IMAGE_BASE64)))
    }

    async fn synthesize_speech(&self, _text: &str) -> AppResult<Option<DataUri>> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.speech).clone())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.unhealthy.load(Ordering::SeqCst))
    }
}

/// Sample recipe with a comma-separated ingredient list
#[must_use]
pub fn sample_recipe(name: &str) -> RecipeSuggestion {
    RecipeSuggestion {
        name: name.to_owned(),
        ingredients: "chicken breast, tomato, rice, onion, garlic".to_owned(),
        instructions: "Cook the rice.\nSear the chicken.\nSimmer with tomato, onion and garlic."
            .to_owned(),
        image_url: None,
    }
}

/// Model answer with three complete recipes
#[must_use]
pub fn three_recipes_json() -> Value {
    json!({
        "recipes": [
            {
                "name": "Chicken Tomato Rice",
                "ingredients": "chicken breast, tomato, rice, onion, garlic",
                "instructions": "Cook rice.\nBrown chicken.\nAdd tomato and simmer."
            },
            {
                "name": "Garlic Chicken Stir Fry",
                "ingredients": "chicken breast, garlic, onion, rice",
                "instructions": "Slice chicken.\nStir fry with garlic and onion.\nServe over rice."
            },
            {
                "name": "Stuffed Tomatoes",
                "ingredients": "tomato, rice, onion, garlic",
                "instructions": "Hollow tomatoes.\nFill with rice mixture.\nBake 25 minutes."
            }
        ]
    })
}

/// 16-bit PCM speech payload as Gemini returns it
#[must_use]
pub fn sample_pcm_speech() -> DataUri {
    let samples: Vec<u8> = [0_i16, 512, -512, 1024, -1024, 0]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    DataUri::from_bytes("audio/L16;codec=pcm;rate=24000", &samples)
}
