use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub database_url: String,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    pub memory_cache_capacity: usize,

    // Cache lifetimes
    pub cache_ttl_secs: u64,
    pub translation_cache_ttl_secs: u64,

    // Translation backend
    pub translate_api_url: String,
    pub translate_timeout_secs: u64,
    pub translation_max_attempts: u32,
    pub translation_retry_delay_ms: u64,

    // Server
    pub api_key: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Storage
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://faqs.db?mode=rwc".to_string()),
            redis_url: optional_var("REDIS_URL"),
            redis_key_prefix: optional_var("REDIS_KEY_PREFIX").unwrap_or_default(),
            memory_cache_capacity: parsed_var("MEMORY_CACHE_CAPACITY", 4096)?,

            // Cache lifetimes
            cache_ttl_secs: parsed_var("CACHE_TTL", 900)?,
            translation_cache_ttl_secs: parsed_var("TRANSLATION_CACHE_TTL", 86_400)?,

            // Translation backend
            translate_api_url: std::env::var("TRANSLATE_API_URL").unwrap_or_else(|_| {
                "https://translate.googleapis.com/translate_a/single".to_string()
            }),
            translate_timeout_secs: parsed_var("TRANSLATE_TIMEOUT_SECS", 10)?,
            translation_max_attempts: parsed_var("TRANSLATION_MAX_ATTEMPTS", 3)?,
            translation_retry_delay_ms: parsed_var("TRANSLATION_RETRY_DELAY_MS", 1000)?,

            // Server
            api_key: optional_var("API_KEY"),
            port: parsed_var("PORT", 8080)?,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn translation_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.translation_cache_ttl_secs)
    }

    pub fn translation_retry_delay(&self) -> Duration {
        Duration::from_millis(self.translation_retry_delay_ms)
    }
}

/// Unset and blank both mean "not configured".
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(name) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{} is not valid: {:?}", name, value)),
        None => Ok(default),
    }
}
