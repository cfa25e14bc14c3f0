use super::{Faq, RichText};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public representation: one language, resolved with English fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicFaq {
    pub id: i64,
    pub question: String,
    /// HTML
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Administrative representation: every stored value, unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminFaq {
    pub id: i64,
    pub question: String,
    pub answer: RichText,
    pub question_hi: Option<String>,
    pub answer_hi: Option<RichText>,
    pub question_bn: Option<String>,
    pub answer_bn: Option<RichText>,
    pub auto_translate: bool,
    pub last_translated: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Faq> for AdminFaq {
    fn from(faq: Faq) -> Self {
        Self {
            id: faq.id,
            question: faq.question,
            answer: faq.answer,
            question_hi: faq.question_hi,
            answer_hi: faq.answer_hi,
            question_bn: faq.question_bn,
            answer_bn: faq.answer_bn,
            auto_translate: faq.auto_translate,
            last_translated: faq.last_translated,
            is_active: faq.is_active,
            created_at: faq.created_at,
            updated_at: faq.updated_at,
        }
    }
}
