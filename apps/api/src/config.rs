use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Application configuration loaded from environment variables.
/// Every variable has a default, so an empty environment still boots
/// (scoring then runs on the fallback path only).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding: EmbeddingConfig,
    /// Seeds the score jitter RNG. `None` → OS entropy.
    pub scoring_seed: Option<u64>,
}

/// Where and how the embedding backends are reached.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub accelerated_url: Option<String>,
    pub cpu_url: Option<String>,
    pub model: String,
    pub init_timeout: Duration,
    pub request_timeout: Duration,
    pub retry_failed_init: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            accelerated_url: None,
            cpu_url: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            init_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(20),
            retry_failed_init: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = EmbeddingConfig::default();

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            embedding: EmbeddingConfig {
                accelerated_url: optional_env("EMBEDDING_ACCELERATED_URL"),
                cpu_url: optional_env("EMBEDDING_CPU_URL"),
                model: optional_env("EMBEDDING_MODEL").unwrap_or(defaults.model),
                init_timeout: Duration::from_secs(parse_env(
                    "EMBEDDING_INIT_TIMEOUT_SECS",
                    defaults.init_timeout.as_secs(),
                )?),
                request_timeout: Duration::from_secs(parse_env(
                    "EMBEDDING_REQUEST_TIMEOUT_SECS",
                    defaults.request_timeout.as_secs(),
                )?),
                retry_failed_init: parse_env(
                    "EMBEDDING_RETRY_FAILED_INIT",
                    defaults.retry_failed_init,
                )?,
            },
            scoring_seed: optional_env("SCORING_SEED")
                .map(|s| s.parse::<u64>())
                .transpose()
                .context("SCORING_SEED must be an unsigned integer")?,
        })
    }
}

/// Returns the variable's value, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
