use super::invalidation::{self, list_key, Invalidation, ALL_LANGUAGES_KEY};
use super::{FaqService, PublicFaq};
use crate::cache::{self, CacheStore};
use crate::i18n::Language;
use anyhow::Result;
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cached listings of active FAQs, one per language plus a grouped view.
pub struct FaqListing {
    faqs: Arc<FaqService>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl FaqListing {
    pub fn new(faqs: Arc<FaqService>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { faqs, cache, ttl }
    }

    /// Active FAQs in `language`, newest first.
    pub async fn list(&self, language: Language) -> Result<Vec<PublicFaq>> {
        let key = list_key(language);
        if let Some(cached) = cache::get_or_miss(self.cache.as_ref(), &key).await {
            return Ok(cached);
        }

        let mut faqs = self.faqs.list_active().await?;
        let mut listing = Vec::with_capacity(faqs.len());
        for faq in faqs.iter_mut() {
            listing.push(self.faqs.to_public(faq, language).await);
        }
        debug!("Built {} listing with {} entries", language, listing.len());

        cache::set_or_skip(self.cache.as_ref(), &key, &listing, self.ttl).await;
        Ok(listing)
    }

    /// Every language's listing keyed by language code.
    pub async fn by_language(&self) -> Result<BTreeMap<String, Vec<PublicFaq>>> {
        if let Some(cached) = cache::get_or_miss(self.cache.as_ref(), ALL_LANGUAGES_KEY).await {
            return Ok(cached);
        }

        let languages = Language::all();
        let listings = try_join_all(languages.iter().map(|language| self.list(*language))).await?;
        let grouped: BTreeMap<String, Vec<PublicFaq>> = languages
            .iter()
            .map(|language| language.code().to_string())
            .zip(listings)
            .collect();

        cache::set_or_skip(self.cache.as_ref(), ALL_LANGUAGES_KEY, &grouped, self.ttl).await;
        Ok(grouped)
    }

    pub async fn invalidate(&self) {
        invalidation::execute(self.cache.as_ref(), &[Invalidation::Listings]).await;
    }
}
