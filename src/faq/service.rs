use super::invalidation::{self, read_key, Invalidation};
use super::{Faq, FaqField, FaqUpdate, FieldValue, NewFaq, PublicFaq, RichText};
use crate::cache::{self, CacheStore};
use crate::db::Database;
use crate::i18n::Language;
use crate::translation::TranslationService;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default lifetime of read cache entries.
pub const DEFAULT_READ_TTL: Duration = Duration::from_secs(15 * 60);

/// FAQ lifecycle: translation of shadow fields, the per-field read cache and
/// the invalidation that goes with every write.
///
/// Translation and cache failures never surface from here; the worst outcome
/// is English content where a translation was expected.
pub struct FaqService {
    db: Database,
    cache: Arc<dyn CacheStore>,
    translator: Arc<TranslationService>,
    read_ttl: Duration,
}

impl FaqService {
    pub fn new(
        db: Database,
        cache: Arc<dyn CacheStore>,
        translator: Arc<TranslationService>,
        read_ttl: Duration,
    ) -> Self {
        Self {
            db,
            cache,
            translator,
            read_ttl,
        }
    }

    /// Translate one source field into `target` and store it as the shadow.
    ///
    /// Returns `false` without side effects when auto-translation is off, the
    /// target is English, the source is empty or the translation failed.
    pub async fn translate_field(&self, faq: &mut Faq, field: FaqField, target: Language) -> bool {
        if !faq.auto_translate || target.is_canonical() {
            return false;
        }

        let translated = match faq.source(field) {
            source if source.is_empty() => return false,
            FieldValue::Rich(rich) => self
                .translator
                .translate_html(&rich.html, target)
                .await
                .map(|html| FieldValue::Rich(RichText::from_html(html))),
            FieldValue::Plain(text) => self
                .translator
                .translate_text(&text, target)
                .await
                .map(FieldValue::Plain),
        };

        let Some(value) = translated else {
            debug!(
                "No {} translation for FAQ {} {}, keeping English fallback",
                target.name(),
                faq.id,
                field
            );
            return false;
        };

        if !faq.set_shadow(field, target, value) {
            return false;
        }
        faq.last_translated = Some(Utc::now());
        true
    }

    /// Translate `fields` into every target language. Each (field, language)
    /// pair is attempted independently. Returns how many succeeded.
    pub async fn update_translations(&self, faq: &mut Faq, fields: &[FaqField]) -> usize {
        if !faq.auto_translate {
            return 0;
        }

        let mut translated = 0;
        for field in fields {
            for target in Language::targets() {
                if self.translate_field(faq, *field, target).await {
                    translated += 1;
                }
            }
        }
        translated
    }

    /// Resolve `field` in `language` through the read cache.
    ///
    /// On a miss, a missing shadow is translated on the spot (when allowed)
    /// and persisted; if there is still nothing, the English source is used.
    /// May wait on the translation backend.
    pub async fn get_translated_text(
        &self,
        faq: &mut Faq,
        field: FaqField,
        language: Language,
    ) -> FieldValue {
        let key = read_key(faq.id, field, language);
        if let Some(cached) = cache::get_or_miss::<FieldValue>(self.cache.as_ref(), &key).await {
            return cached;
        }

        let value = if language.is_canonical() {
            faq.source(field)
        } else {
            let mut shadow = faq.shadow(field, language);
            if shadow.is_none()
                && faq.auto_translate
                && self.translate_field(faq, field, language).await
            {
                if let Err(e) = self.persist_shadow(faq, field, language).await {
                    warn!("Failed to persist lazy translation for FAQ {}: {:#}", faq.id, e);
                }
                shadow = faq.shadow(field, language);
            }
            shadow.unwrap_or_else(|| faq.source(field))
        };

        cache::set_or_skip(self.cache.as_ref(), &key, &value, self.read_ttl).await;
        value
    }

    /// Write the one shadow column `translate_field` just filled. The rest
    /// of `faq` may be stale and is never written back from here.
    async fn persist_shadow(&self, faq: &Faq, field: FaqField, language: Language) -> Result<()> {
        let Some(value) = faq.shadow(field, language) else {
            return Ok(());
        };
        let translated_at = faq.last_translated.unwrap_or_else(Utc::now);
        self.db
            .save_shadow(faq.id, field, language, &value, translated_at)
            .await
    }

    /// Public representation of `faq` in `language`.
    pub async fn to_public(&self, faq: &mut Faq, language: Language) -> PublicFaq {
        let question = self
            .get_translated_text(faq, FaqField::Question, language)
            .await
            .into_text();
        let answer = self
            .get_translated_text(faq, FaqField::Answer, language)
            .await
            .into_text();

        PublicFaq {
            id: faq.id,
            question,
            answer,
            created_at: faq.created_at,
            updated_at: faq.updated_at,
            is_active: faq.is_active,
        }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Faq>> {
        self.db.get_faq(id).await
    }

    pub async fn list_active(&self) -> Result<Vec<Faq>> {
        self.db.list_active_faqs().await
    }

    /// Insert a FAQ, translating every shadow the caller did not supply.
    pub async fn create(&self, new: NewFaq) -> Result<Faq> {
        let provided = new.provided_shadows();
        let mut faq = self.db.insert_faq(&new).await?;
        info!("Created FAQ {}: {}", faq.id, faq);

        if faq.auto_translate {
            let mut translated = 0;
            for field in FaqField::ALL {
                for target in Language::targets() {
                    if !provided.contains(&(field, target))
                        && self.translate_field(&mut faq, field, target).await
                    {
                        self.persist_shadow(&faq, field, target).await?;
                        translated += 1;
                    }
                }
            }
            if translated > 0 {
                info!("Stored {} translations for FAQ {}", translated, faq.id);
            }
        }

        invalidation::execute(self.cache.as_ref(), &Invalidation::for_write(faq.id)).await;
        Ok(faq)
    }

    /// Apply an administrative update. Returns `None` if the FAQ is gone.
    ///
    /// Changed English fields are re-translated, and empty shadows are
    /// filled, unless the same request supplied that shadow itself.
    pub async fn update(&self, id: i64, update: FaqUpdate) -> Result<Option<Faq>> {
        let Some(mut faq) = self.db.get_faq(id).await? else {
            return Ok(None);
        };

        let changed = faq.changed_source_fields(&update);
        let provided = update.provided_shadows();

        invalidation::execute(self.cache.as_ref(), &[Invalidation::FieldReads { faq_id: id }])
            .await;

        faq.apply(update);
        faq.updated_at = Utc::now();

        if faq.auto_translate {
            for field in FaqField::ALL {
                for target in Language::targets() {
                    let stale = changed.contains(&field) || faq.shadow(field, target).is_none();
                    if stale && !provided.contains(&(field, target)) {
                        self.translate_field(&mut faq, field, target).await;
                    }
                }
            }
        }

        if !self.db.update_faq(&faq).await? {
            return Ok(None);
        }
        if !changed.is_empty() {
            info!("Updated FAQ {} (changed: {:?})", faq.id, changed);
        }

        invalidation::execute(self.cache.as_ref(), &Invalidation::for_write(id)).await;
        Ok(Some(faq))
    }

    /// Hard delete. Caches are purged first; a cache outage never blocks
    /// the delete.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        invalidation::execute(self.cache.as_ref(), &Invalidation::for_write(id)).await;

        let deleted = self.db.delete_faq(id).await?;
        if deleted {
            info!("Deleted FAQ {}", id);
        }
        Ok(deleted)
    }
}
