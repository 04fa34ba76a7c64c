// ABOUTME: Unit tests for config environment functionality
// ABOUTME: Validates env var parsing, defaults, validation errors and secret-free summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use cookai::config::environment::{load_dotenv, Environment, ServerConfig, DEFAULT_HTTP_PORT};
use cookai::constants::{env_vars, models};
use cookai::errors::ErrorCode;
use cookai::services::ImagePolicy;
use serial_test::serial;
use tempfile::TempDir;

const ALL_VARS: &[&str] = &[
    env_vars::HTTP_PORT,
    env_vars::GEMINI_API_KEY,
    env_vars::GEMINI_BASE_URL,
    env_vars::TEXT_MODEL,
    env_vars::IMAGE_MODEL,
    env_vars::TTS_MODEL,
    env_vars::TTS_VOICE,
    env_vars::FAVORITES_PATH,
    env_vars::IMAGE_CONCURRENCY,
    env_vars::IMAGE_POLICY,
    env_vars::HTTP_TIMEOUT_SECS,
    env_vars::ENVIRONMENT,
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_environment_parsing() {
    assert_eq!(
        Environment::from_str_or_default("production"),
        Environment::Production
    );
    assert_eq!(
        Environment::from_str_or_default("PROD"),
        Environment::Production
    );
    assert_eq!(
        Environment::from_str_or_default("test"),
        Environment::Testing
    );
    assert_eq!(
        Environment::from_str_or_default("anything"),
        Environment::Development
    );
    assert!(Environment::Production.is_production());
    assert_eq!(Environment::Testing.to_string(), "testing");
}

#[test]
#[serial]
fn test_defaults_with_only_api_key() {
    clear_env();
    env::set_var(env_vars::GEMINI_API_KEY, "secret-gemini-key");

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.gemini.text_model, models::DEFAULT_TEXT_MODEL);
    assert_eq!(config.gemini.tts_voice, models::DEFAULT_TTS_VOICE);
    assert_eq!(config.gemini.base_url, models::GEMINI_API_BASE_URL);
    assert_eq!(config.image_concurrency, 3);
    assert_eq!(config.image_policy, ImagePolicy::AllOrNothing);
    assert_eq!(config.gemini.timeout, Duration::from_secs(60));

    clear_env();
}

#[test]
#[serial]
fn test_missing_api_key_is_reported() {
    clear_env();
    env::set_var(env_vars::GEMINI_API_KEY, "   ");

    let error = ServerConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigMissing);
    assert!(error.message.contains(env_vars::GEMINI_API_KEY));

    clear_env();
}

#[test]
#[serial]
fn test_overrides_are_applied() {
    clear_env();
    env::set_var(env_vars::GEMINI_API_KEY, "secret-gemini-key");
    env::set_var(env_vars::HTTP_PORT, "9090");
    env::set_var(env_vars::ENVIRONMENT, "production");
    env::set_var(env_vars::TTS_VOICE, "Kore");
    env::set_var(env_vars::FAVORITES_PATH, "/tmp/cookai/favs.json");
    env::set_var(env_vars::IMAGE_CONCURRENCY, "1");
    env::set_var(env_vars::IMAGE_POLICY, "best-effort");

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 9090);
    assert!(config.environment.is_production());
    assert_eq!(config.gemini.tts_voice, "Kore");
    assert_eq!(config.favorites_path, PathBuf::from("/tmp/cookai/favs.json"));
    assert_eq!(config.image_concurrency, 1);
    assert_eq!(config.image_policy, ImagePolicy::BestEffort);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_env();
    env::set_var(env_vars::GEMINI_API_KEY, "secret-gemini-key");

    env::set_var(env_vars::HTTP_PORT, "not-a-port");
    assert_eq!(
        ServerConfig::from_env().unwrap_err().code,
        ErrorCode::ConfigInvalid
    );
    env::remove_var(env_vars::HTTP_PORT);

    env::set_var(env_vars::IMAGE_CONCURRENCY, "0");
    assert_eq!(
        ServerConfig::from_env().unwrap_err().code,
        ErrorCode::ConfigInvalid
    );
    env::remove_var(env_vars::IMAGE_CONCURRENCY);

    env::set_var(env_vars::IMAGE_POLICY, "sometimes");
    assert!(ServerConfig::from_env().is_err());

    clear_env();
}

#[test]
#[serial]
fn test_summary_and_debug_hide_api_key() {
    clear_env();
    env::set_var(env_vars::GEMINI_API_KEY, "secret-gemini-key");

    let config = ServerConfig::from_env().unwrap();
    let summary = config.summary();
    assert!(summary.contains("HTTP Port: 8080"));
    assert!(!summary.contains("secret-gemini-key"));
    assert!(!format!("{config:?}").contains("secret-gemini-key"));
    assert!(!format!("{:?}", config.gemini.to_client_config()).contains("secret-gemini-key"));

    clear_env();
}

#[test]
#[serial]
fn test_dotenv_is_loaded_separately_from_config() {
    clear_env();
    let original_dir = env::current_dir().unwrap();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        format!("{}=dotenv-gemini-key\n", env_vars::GEMINI_API_KEY),
    )
    .unwrap();
    env::set_current_dir(dir.path()).unwrap();

    // Reading the config alone must not pick up .env
    let before = ServerConfig::from_env();

    let loaded = load_dotenv();
    let after = ServerConfig::from_env();

    env::set_current_dir(original_dir).unwrap();
    clear_env();

    assert_eq!(before.unwrap_err().code, ErrorCode::ConfigMissing);
    assert!(loaded.unwrap().ends_with(".env"));
    assert_eq!(after.unwrap().gemini.api_key, "dotenv-gemini-key");
}
