use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,

    // LLM settings
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_max_tokens: u32,
    pub openai_temperature: f32,

    // Upload limits
    pub max_file_size: usize,
    pub max_files: usize,

    // Cache TTLs
    pub cache_default_ttl: Duration,
    pub cache_pdf_ttl: Duration,
    pub cache_analysis_ttl: Duration,

    // Rate limiting
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,

    // Background cleanup cadence for cache and rate-limiter maps
    pub maintenance_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            openai_max_tokens: parse_or("OPENAI_MAX_TOKENS", 4000)?,
            openai_temperature: env::var("OPENAI_TEMPERATURE")
                .unwrap_or_else(|_| "0.3".to_string())
                .parse()
                .context("OPENAI_TEMPERATURE must be a valid float")?,
            max_file_size: parse_or("MAX_FILE_SIZE_BYTES", 25 * 1024 * 1024)?,
            max_files: parse_or("MAX_FILE_COUNT", 5)?,
            cache_default_ttl: Duration::from_secs(parse_or("CACHE_DEFAULT_TTL_SECS", 60 * 60)?),
            cache_pdf_ttl: Duration::from_secs(parse_or(
                "CACHE_PDF_TTL_SECS",
                7 * 24 * 60 * 60,
            )?),
            cache_analysis_ttl: Duration::from_secs(parse_or(
                "CACHE_ANALYSIS_TTL_SECS",
                24 * 60 * 60,
            )?),
            rate_limit_max_requests: parse_or("RATE_LIMIT_MAX_REQUESTS", 10)?,
            rate_limit_window: Duration::from_secs(parse_or("RATE_LIMIT_WINDOW_SECS", 60)?),
            maintenance_interval: Duration::from_secs(parse_or(
                "MAINTENANCE_INTERVAL_SECS",
                5 * 60,
            )?),
        })
    }
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}
