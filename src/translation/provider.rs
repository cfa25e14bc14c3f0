use crate::i18n::Language;
use anyhow::Result;
use async_trait::async_trait;

/// A third-party text translation backend.
///
/// Implementations translate exactly once per call and report every network or
/// backend failure as an error; retrying and caching are layered on top by
/// [`TranslationService`](super::TranslationService).
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String>;
}
