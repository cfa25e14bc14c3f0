use super::TranslationProvider;
use crate::cache::{self, CacheStore};
use crate::i18n::Language;
use crate::retry::{with_retry, RetryConfig};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, error};

/// How long a translated string stays in the translation cache.
pub const DEFAULT_TRANSLATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Tags the HTML pass puts back into canonical form, as (pattern, replacement).
const PRESERVED_TAGS: [(&str, &str); 7] = [
    (r"(?i)<\s*p\s*>", "<p>"),
    (r"(?i)<\s*/\s*p\s*>", "</p>"),
    (r"(?i)<\s*br\s*/?\s*>", "<br>"),
    (r"(?i)<\s*strong\s*>", "<strong>"),
    (r"(?i)<\s*/\s*strong\s*>", "</strong>"),
    (r"(?i)<\s*em\s*>", "<em>"),
    (r"(?i)<\s*/\s*em\s*>", "</em>"),
];

/// Retrying, caching front end for a [`TranslationProvider`].
///
/// Never fails: every method returns `None` when no translation could be
/// produced, and callers keep serving the English source in that case.
pub struct TranslationService {
    provider: Arc<dyn TranslationProvider>,
    cache: Arc<dyn CacheStore>,
    retry: RetryConfig,
    cache_ttl: Duration,
}

impl TranslationService {
    pub fn new(provider: Arc<dyn TranslationProvider>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            provider,
            cache,
            retry: RetryConfig::translation(),
            cache_ttl: DEFAULT_TRANSLATION_TTL,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Cache key for a translation. The fingerprint covers the whole text so
    /// strings sharing a prefix never share an entry.
    pub fn cache_key(text: &str, target: Language) -> String {
        format!("trans:{}:{}", target.code(), blake3::hash(text.as_bytes()).to_hex())
    }

    /// Translate plain text from English into `target`.
    ///
    /// Empty text and English targets are returned unchanged without touching
    /// the cache or the provider.
    pub async fn translate_text(&self, text: &str, target: Language) -> Option<String> {
        if text.is_empty() || target.is_canonical() {
            return Some(text.to_string());
        }

        let key = Self::cache_key(text, target);
        let cached: Option<String> = cache::get_or_miss(self.cache.as_ref(), &key).await;
        if let Some(cached) = cached.filter(|t| !t.is_empty()) {
            debug!("Translation cache hit for {}", key);
            return Some(cached);
        }

        let translated = self.translate_with_retry(text, target).await?;
        cache::set_or_skip(self.cache.as_ref(), &key, &translated, self.cache_ttl).await;
        Some(translated)
    }

    /// Call the provider with retries. An empty translation counts as failure.
    pub async fn translate_with_retry(&self, text: &str, target: Language) -> Option<String> {
        let source = Language::canonical();
        let result = with_retry(
            &self.retry,
            &format!("Translation to {}", target.name()),
            || self.provider.translate(text, source, target),
        )
        .await;

        match result {
            Ok(translated) if !translated.is_empty() => Some(translated),
            Ok(_) => {
                error!("Translation to {} came back empty", target.name());
                None
            }
            Err(_) => {
                error!(
                    "All translation attempts failed for text: {}...",
                    preview(text, 100)
                );
                None
            }
        }
    }

    /// Translate an HTML fragment as a single string, then put the common
    /// formatting tags back into canonical form.
    ///
    /// This is not markup-aware: attributed tags and tags outside the fixed
    /// list are passed through whatever the backend did to them.
    pub async fn translate_html(&self, html: &str, target: Language) -> Option<String> {
        if html.is_empty() || target.is_canonical() {
            return Some(html.to_string());
        }

        let translated = self.translate_text(html, target).await?;
        match restore_preserved_tags(&translated) {
            Ok(restored) => Some(restored),
            Err(e) => {
                error!("HTML translation failed: {}", e);
                None
            }
        }
    }
}

fn preserved_tag_patterns() -> Result<&'static [(Regex, &'static str)], regex::Error> {
    static PATTERNS: OnceLock<Result<Vec<(Regex, &'static str)>, regex::Error>> = OnceLock::new();

    PATTERNS
        .get_or_init(|| {
            PRESERVED_TAGS
                .iter()
                .map(|(pattern, tag)| Ok((Regex::new(pattern)?, *tag)))
                .collect()
        })
        .as_ref()
        .map(Vec::as_slice)
        .map_err(Clone::clone)
}

/// Rewrite case- or whitespace-mangled `<p>`, `<br>`, `<strong>` and `<em>`
/// tags (and their closing forms) to their canonical lowercase spelling.
pub fn restore_preserved_tags(text: &str) -> Result<String, regex::Error> {
    let mut restored = text.to_string();
    for (pattern, tag) in preserved_tag_patterns()? {
        restored = pattern.replace_all(&restored, *tag).into_owned();
    }
    Ok(restored)
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
