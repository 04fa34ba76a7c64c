// ABOUTME: Application constants grouped by domain
// ABOUTME: Model defaults, limits, environment variable names and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// Service identity used in logs and health responses
pub mod service_names {
    /// Canonical service name
    pub const COOKAI_SERVER: &str = "cookai-server";
}

/// Recipe generation limits
pub mod limits {
    /// Minimum number of characters (after trimming) for the ingredient text
    pub const MIN_INGREDIENTS_LEN: usize = 10;

    /// Number of recipe suggestions requested and required per generation call
    pub const RECIPE_COUNT: usize = 3;

    /// Default number of image generation requests in flight at once
    pub const DEFAULT_IMAGE_CONCURRENCY: usize = 3;

    /// Default HTTP timeout for AI backend calls
    pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

    /// Seconds a recipe view may sit untouched before it is dropped
    pub const VIEW_IDLE_TTL_SECS: u64 = 60 * 60;

    /// Open view count at which `open` sweeps idle views
    pub const VIEW_CLEANUP_THRESHOLD: usize = 256;

    /// Largest JSON body accepted by the HTTP API (voice clips travel inline)
    pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;
}

/// Gemini model and voice defaults
pub mod models {
    /// Model used for structured text generation
    pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";

    /// Model used for recipe image generation
    pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

    /// Model used for speech synthesis
    pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

    /// Prebuilt voice used for narration
    pub const DEFAULT_TTS_VOICE: &str = "Algenib";

    /// Base URL for the Gemini API
    pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// Speech output format
pub mod audio {
    /// Sample rate Gemini uses for raw PCM speech when the mime type omits it
    pub const DEFAULT_PCM_SAMPLE_RATE: u32 = 24_000;

    /// Channels in synthesized speech
    pub const PCM_CHANNELS: u16 = 1;

    /// Bits per sample in synthesized speech
    pub const PCM_BITS_PER_SAMPLE: u16 = 16;
}

/// Favorites persistence
pub mod storage {
    /// Current on-disk schema version of the favorites file
    pub const FAVORITES_SCHEMA_VERSION: u32 = 1;

    /// Default location of the favorites file
    pub const DEFAULT_FAVORITES_PATH: &str = "./data/cookai_favorites.json";

    /// Capacity of the favorites change notification channel
    pub const FAVORITES_EVENT_CAPACITY: usize = 64;
}

/// Environment variable names
pub mod env_vars {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Override for the Gemini API base URL
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
    /// Structured text model
    pub const TEXT_MODEL: &str = "COOKAI_TEXT_MODEL";
    /// Image model
    pub const IMAGE_MODEL: &str = "COOKAI_IMAGE_MODEL";
    /// Speech model
    pub const TTS_MODEL: &str = "COOKAI_TTS_MODEL";
    /// Speech voice
    pub const TTS_VOICE: &str = "COOKAI_TTS_VOICE";
    /// Favorites file path
    pub const FAVORITES_PATH: &str = "COOKAI_FAVORITES_PATH";
    /// Image fan-out width
    pub const IMAGE_CONCURRENCY: &str = "COOKAI_IMAGE_CONCURRENCY";
    /// Image failure policy
    pub const IMAGE_POLICY: &str = "COOKAI_IMAGE_POLICY";
    /// Backend HTTP timeout
    pub const HTTP_TIMEOUT_SECS: &str = "COOKAI_HTTP_TIMEOUT_SECS";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}
