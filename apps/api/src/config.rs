use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::scouting::inference::InferenceSettings;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub profiles_path: PathBuf,
    /// Optional JSON vocabulary; the built-in one is used when unset.
    pub vocabulary_path: Option<PathBuf>,
    /// Without a key the model tier is disabled and inference starts at the keyword tier.
    pub anthropic_api_key: Option<String>,
    pub scorer_timeout: Duration,
    pub inference: InferenceSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = InferenceSettings::default();

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            profiles_path: optional_env("PROFILES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/profiles.json")),
            vocabulary_path: optional_env("VOCABULARY_PATH").map(PathBuf::from),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            scorer_timeout: Duration::from_millis(parse_env("SCORER_TIMEOUT_MS", 4000)?),
            inference: InferenceSettings {
                score_threshold: parse_env("SCORE_THRESHOLD", defaults.score_threshold)?,
                model_tag_cap: parse_env("MODEL_TAG_CAP", defaults.model_tag_cap)?,
                tier_tag_cap: parse_env("TIER_TAG_CAP", defaults.tier_tag_cap)?,
            },
        })
    }
}

/// Unset and blank variables both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
