use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::pipeline::{ScoringMode, DEFAULT_LLM_THRESHOLD};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Absent key disables the external model; llm/hybrid modes then score by keyword only.
    pub anthropic_api_key: Option<String>,
    pub matcher_mode: ScoringMode,
    pub matcher_llm_threshold: f64,
    pub scrape_workers: usize,
    pub watch_interval_secs: u64,
    pub min_match_score: f64,
    pub webhook_url: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let matcher_mode = match optional_env("MATCHER_MODE") {
            Some(raw) => ScoringMode::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("MATCHER_MODE is invalid: {e}"))?,
            None => ScoringMode::Keyword,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            matcher_mode,
            matcher_llm_threshold: parse_env("MATCHER_LLM_THRESHOLD", DEFAULT_LLM_THRESHOLD)?,
            scrape_workers: parse_env("SCRAPE_WORKERS", 5)?,
            watch_interval_secs: parse_env("WATCH_INTERVAL_SECS", 1800)?,
            min_match_score: parse_env("MIN_MATCH_SCORE", 50.0)?,
            webhook_url: optional_env("WEBHOOK_URL"),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
