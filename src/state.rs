use crate::cache::{CacheStore, MemoryCache, RedisCache};
use crate::config::Config;
use crate::db::Database;
use crate::faq::{FaqListing, FaqService};
use crate::retry::RetryConfig;
use crate::translation::{GoogleTranslateProvider, TranslationProvider, TranslationService};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Everything a request handler needs. Built once at startup.
pub struct AppState {
    pub config: Config,
    pub faqs: Arc<FaqService>,
    pub listing: FaqListing,
}

impl AppState {
    /// Open the database, pick the cache backend and wire the Google provider.
    pub async fn from_config(config: Config) -> Result<Arc<Self>> {
        let db = Database::connect(&config.database_url).await?;
        db.migrate().await?;

        let cache: Arc<dyn CacheStore> = match &config.redis_url {
            Some(url) => {
                info!("Using Redis cache (key prefix {:?})", config.redis_key_prefix);
                Arc::new(
                    RedisCache::new(url, config.redis_key_prefix.clone())
                        .context("Invalid REDIS_URL")?,
                )
            }
            None => {
                info!(
                    "REDIS_URL not set, using in-process cache ({} entries)",
                    config.memory_cache_capacity
                );
                Arc::new(MemoryCache::new(config.memory_cache_capacity))
            }
        };

        let provider = Arc::new(GoogleTranslateProvider::from_config(&config)?);
        Ok(Self::new(config, db, cache, provider))
    }

    pub fn new(
        config: Config,
        db: Database,
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn TranslationProvider>,
    ) -> Arc<Self> {
        let retry = RetryConfig::fixed(
            config.translation_max_attempts,
            config.translation_retry_delay(),
        );
        let translator = Arc::new(
            TranslationService::new(provider, cache.clone())
                .with_retry(retry)
                .with_cache_ttl(config.translation_cache_ttl()),
        );
        let faqs = Arc::new(FaqService::new(
            db,
            cache.clone(),
            translator,
            config.cache_ttl(),
        ));
        let listing = FaqListing::new(faqs.clone(), cache, config.cache_ttl());

        Arc::new(Self {
            config,
            faqs,
            listing,
        })
    }
}
