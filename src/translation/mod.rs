//! Translation of English FAQ content into the other supported languages.
//!
//! - `provider`: the backend contract, one call per string, no retries
//! - `google`: HTTP implementation against the public Google Translate endpoint
//! - `service`: retry, content-addressed caching and HTML tag restoration

mod google;
mod provider;
mod service;

pub use google::GoogleTranslateProvider;
pub use provider::TranslationProvider;
pub use service::{restore_preserved_tags, TranslationService};

#[cfg(test)]
pub(crate) mod testing {
    use super::TranslationProvider;
    use crate::i18n::Language;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Deterministic provider: answers `"{code}:{text}"` unless told to fail,
    /// to return a fixed string or to answer slowly. Counts every call.
    #[derive(Default)]
    pub struct StubProvider {
        calls: AtomicUsize,
        fail: AtomicBool,
        fixed: Mutex<Option<String>>,
        latency: Mutex<Option<Duration>>,
    }

    impl StubProvider {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn failing() -> Arc<Self> {
            let stub = Self::default();
            stub.fail.store(true, Ordering::SeqCst);
            Arc::new(stub)
        }

        pub fn returning(text: &str) -> Arc<Self> {
            let stub = Self::default();
            *stub.fixed.lock() = Some(text.to_string());
            Arc::new(stub)
        }

        /// Answers normally, but only after `latency`.
        pub fn slow(latency: Duration) -> Arc<Self> {
            let stub = Self::default();
            *stub.latency.lock() = Some(latency);
            Arc::new(stub)
        }

        pub fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslationProvider for StubProvider {
        async fn translate(
            &self,
            text: &str,
            _source: Language,
            target: Language,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let latency = *self.latency.lock();
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("translation backend unavailable");
            }
            if let Some(fixed) = self.fixed.lock().as_ref() {
                return Ok(fixed.clone());
            }
            Ok(format!("{}:{}", target.code(), text))
        }
    }
}
