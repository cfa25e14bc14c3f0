//! Cache keys derived from FAQs and the invalidation plan run after writes.

use super::FaqField;
use crate::cache::{self, CacheStore};
use crate::i18n::Language;
use tracing::debug;

/// Key of the grouped-by-language listing.
pub const ALL_LANGUAGES_KEY: &str = "faq_list:all_languages";

/// Per-entry read cache key for one resolved field value.
pub fn read_key(faq_id: i64, field: FaqField, language: Language) -> String {
    format!("faq:{}:{}:{}", faq_id, field.name(), language.code())
}

/// Listing cache key for one language.
pub fn list_key(language: Language) -> String {
    format!("faq_list:{}", language.code())
}

/// A group of cache entries made stale by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Every (field, language) read cache entry of one FAQ.
    FieldReads { faq_id: i64 },
    /// Every per-language listing plus the grouped listing.
    Listings,
}

impl Invalidation {
    /// What a create, update or delete of `faq_id` makes stale.
    pub fn for_write(faq_id: i64) -> Vec<Invalidation> {
        vec![Invalidation::FieldReads { faq_id }, Invalidation::Listings]
    }

    pub fn keys(&self) -> Vec<String> {
        match self {
            Invalidation::FieldReads { faq_id } => FaqField::ALL
                .iter()
                .flat_map(|field| {
                    Language::all()
                        .into_iter()
                        .map(move |language| read_key(*faq_id, *field, language))
                })
                .collect(),
            Invalidation::Listings => Language::all()
                .into_iter()
                .map(list_key)
                .chain(std::iter::once(ALL_LANGUAGES_KEY.to_string()))
                .collect(),
        }
    }
}

/// Delete every key in `plan`. Cache failures are logged and skipped.
pub async fn execute(cache: &dyn CacheStore, plan: &[Invalidation]) {
    for invalidation in plan {
        debug!("Invalidating {:?}", invalidation);
        for key in invalidation.keys() {
            cache::delete_or_skip(cache, &key).await;
        }
    }
}
