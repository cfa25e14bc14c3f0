use crate::i18n::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// English source fields of a FAQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqField {
    Question,
    Answer,
}

/// Shape of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Plain,
    Rich,
}

impl FaqField {
    pub const ALL: [FaqField; 2] = [FaqField::Question, FaqField::Answer];

    pub fn name(&self) -> &'static str {
        match self {
            FaqField::Question => "question",
            FaqField::Answer => "answer",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FaqField::Question => FieldKind::Plain,
            FaqField::Answer => FieldKind::Rich,
        }
    }
}

impl fmt::Display for FaqField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rich-text value: rendered HTML plus the editor's delta (edit history).
///
/// Deserializes from either `{"delta": ..., "html": "..."}` or a bare HTML
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RichTextRepr")]
pub struct RichText {
    pub delta: Value,
    pub html: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RichTextRepr {
    Html(String),
    Full {
        #[serde(default)]
        delta: Value,
        html: String,
    },
}

impl From<RichTextRepr> for RichText {
    fn from(repr: RichTextRepr) -> Self {
        match repr {
            RichTextRepr::Html(html) => RichText::from_html(html),
            RichTextRepr::Full { delta, html } if delta.is_null() => RichText::from_html(html),
            RichTextRepr::Full { delta, html } => RichText { delta, html },
        }
    }
}

impl RichText {
    /// Wrap HTML in a minimal single-insert delta.
    pub fn from_html(html: impl Into<String>) -> Self {
        let html = html.into();
        RichText {
            delta: json!({ "ops": [{ "insert": format!("{}\n", html) }] }),
            html,
        }
    }

    /// Read a stored column: JSON `{delta, html}`, or legacy bare HTML.
    pub fn parse(stored: &str) -> Self {
        serde_json::from_str(stored).unwrap_or_else(|_| RichText::from_html(stored))
    }

    pub fn to_json(&self) -> String {
        json!({ "delta": self.delta, "html": self.html }).to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.html.trim().is_empty()
    }
}

/// A resolved field value, tagged with its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Plain(String),
    Rich(RichText),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Plain(_) => FieldKind::Plain,
            FieldValue::Rich(_) => FieldKind::Rich,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Plain(text) => text.trim().is_empty(),
            FieldValue::Rich(rich) => rich.is_empty(),
        }
    }

    /// Plain text as is, rich text as HTML.
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Plain(text) => text,
            FieldValue::Rich(rich) => rich.html,
        }
    }
}

/// A FAQ entry: English source fields plus per-language shadow fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Faq {
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

impl Faq {
    /// The English value of `field`.
    pub fn source(&self, field: FaqField) -> FieldValue {
        match field {
            FaqField::Question => FieldValue::Plain(self.question.clone()),
            FaqField::Answer => FieldValue::Rich(self.answer.clone()),
        }
    }

    /// The stored translation of `field` into `language`, if there is a
    /// non-empty one.
    pub fn shadow(&self, field: FaqField, language: Language) -> Option<FieldValue> {
        let value = match field {
            FaqField::Question => self
                .question_slot(language)?
                .clone()
                .map(FieldValue::Plain),
            FaqField::Answer => self.answer_slot(language)?.clone().map(FieldValue::Rich),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Store a translation. Returns `false` when `language` has no shadow
    /// columns or `value` has the wrong shape for `field`.
    pub fn set_shadow(&mut self, field: FaqField, language: Language, value: FieldValue) -> bool {
        if value.kind() != field.kind() {
            return false;
        }
        match value {
            FieldValue::Plain(text) => match self.question_slot_mut(language) {
                Some(slot) => *slot = Some(text),
                None => return false,
            },
            FieldValue::Rich(rich) => match self.answer_slot_mut(language) {
                Some(slot) => *slot = Some(rich),
                None => return false,
            },
        }
        true
    }

    /// Source fields whose incoming English value differs from this one.
    pub fn changed_source_fields(&self, update: &FaqUpdate) -> Vec<FaqField> {
        let mut changed = Vec::new();
        if update
            .question
            .as_ref()
            .is_some_and(|question| *question != self.question)
        {
            changed.push(FaqField::Question);
        }
        if update
            .answer
            .as_ref()
            .is_some_and(|answer| answer.html != self.answer.html)
        {
            changed.push(FaqField::Answer);
        }
        changed
    }

    /// Apply an administrative update. Empty shadow values clear the shadow.
    pub fn apply(&mut self, update: FaqUpdate) {
        if let Some(question) = update.question {
            self.question = question;
        }
        if let Some(answer) = update.answer {
            self.answer = answer;
        }
        if let Some(question_hi) = update.question_hi {
            self.question_hi = non_empty_text(question_hi);
        }
        if let Some(answer_hi) = update.answer_hi {
            self.answer_hi = non_empty_rich(answer_hi);
        }
        if let Some(question_bn) = update.question_bn {
            self.question_bn = non_empty_text(question_bn);
        }
        if let Some(answer_bn) = update.answer_bn {
            self.answer_bn = non_empty_rich(answer_bn);
        }
        if let Some(auto_translate) = update.auto_translate {
            self.auto_translate = auto_translate;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
    }

    fn question_slot(&self, language: Language) -> Option<&Option<String>> {
        match language {
            Language::HINDI => Some(&self.question_hi),
            Language::BENGALI => Some(&self.question_bn),
            _ => None,
        }
    }

    fn question_slot_mut(&mut self, language: Language) -> Option<&mut Option<String>> {
        match language {
            Language::HINDI => Some(&mut self.question_hi),
            Language::BENGALI => Some(&mut self.question_bn),
            _ => None,
        }
    }

    fn answer_slot(&self, language: Language) -> Option<&Option<RichText>> {
        match language {
            Language::HINDI => Some(&self.answer_hi),
            Language::BENGALI => Some(&self.answer_bn),
            _ => None,
        }
    }

    fn answer_slot_mut(&mut self, language: Language) -> Option<&mut Option<RichText>> {
        match language {
            Language::HINDI => Some(&mut self.answer_hi),
            Language::BENGALI => Some(&mut self.answer_bn),
            _ => None,
        }
    }
}

impl fmt::Display for Faq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.question.chars().take(100).collect();
        f.write_str(&shown)
    }
}

fn non_empty_text(text: String) -> Option<String> {
    Some(text).filter(|t| !t.trim().is_empty())
}

fn non_empty_rich(rich: RichText) -> Option<RichText> {
    Some(rich).filter(|r| !r.is_empty())
}

fn default_true() -> bool {
    true
}

/// Input for creating a FAQ.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFaq {
    pub question: String,
    pub answer: RichText,
    #[serde(default)]
    pub question_hi: Option<String>,
    #[serde(default)]
    pub answer_hi: Option<RichText>,
    #[serde(default)]
    pub question_bn: Option<String>,
    #[serde(default)]
    pub answer_bn: Option<RichText>,
    #[serde(default = "default_true")]
    pub auto_translate: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewFaq {
    pub fn new(question: impl Into<String>, answer_html: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: RichText::from_html(answer_html),
            question_hi: None,
            answer_hi: None,
            question_bn: None,
            answer_bn: None,
            auto_translate: true,
            is_active: true,
        }
    }

    pub fn with_auto_translate(mut self, auto_translate: bool) -> Self {
        self.auto_translate = auto_translate;
        self
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.question.trim().is_empty() {
            return Err("question must not be empty");
        }
        if self.answer.is_empty() {
            return Err("answer must not be empty");
        }
        Ok(())
    }

    /// Shadow values supplied by the caller, which translation must not overwrite.
    pub fn provided_shadows(&self) -> Vec<(FaqField, Language)> {
        provided(
            self.question_hi.as_deref(),
            self.answer_hi.as_ref(),
            self.question_bn.as_deref(),
            self.answer_bn.as_ref(),
        )
    }
}

/// Administrative partial update. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<RichText>,
    pub question_hi: Option<String>,
    pub answer_hi: Option<RichText>,
    pub question_bn: Option<String>,
    pub answer_bn: Option<RichText>,
    pub auto_translate: Option<bool>,
    pub is_active: Option<bool>,
}

impl FaqUpdate {
    pub fn question(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            ..Self::default()
        }
    }

    /// Shadow values supplied by the caller, which translation must not overwrite.
    pub fn provided_shadows(&self) -> Vec<(FaqField, Language)> {
        provided(
            self.question_hi.as_deref(),
            self.answer_hi.as_ref(),
            self.question_bn.as_deref(),
            self.answer_bn.as_ref(),
        )
    }
}

fn provided(
    question_hi: Option<&str>,
    answer_hi: Option<&RichText>,
    question_bn: Option<&str>,
    answer_bn: Option<&RichText>,
) -> Vec<(FaqField, Language)> {
    [
        (FaqField::Question, Language::HINDI, question_hi.is_some()),
        (FaqField::Answer, Language::HINDI, answer_hi.is_some()),
        (FaqField::Question, Language::BENGALI, question_bn.is_some()),
        (FaqField::Answer, Language::BENGALI, answer_bn.is_some()),
    ]
    .into_iter()
    .filter(|(_, _, given)| *given)
    .map(|(field, language, _)| (field, language))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Faq {
        let now = Utc::now();
        Faq {
            id: 1,
            question: "What is X?".to_string(),
            answer: RichText::from_html("<p>It is Y</p>"),
            question_hi: None,
            answer_hi: None,
            question_bn: Some("X কী?".to_string()),
            answer_bn: None,
            auto_translate: true,
            last_translated: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(FaqField::Question.kind(), FieldKind::Plain);
        assert_eq!(FaqField::Answer.kind(), FieldKind::Rich);
        assert_eq!(FieldValue::Plain("q".to_string()).kind(), FieldKind::Plain);
        assert_eq!(FaqField::Answer.to_string(), "answer");
    }

    #[test]
    fn test_rich_text_from_html_builds_delta() {
        let rich = RichText::from_html("<p>Hi</p>");
        assert_eq!(rich.delta["ops"][0]["insert"], "<p>Hi</p>\n");
    }

    #[test]
    fn test_rich_text_parse_json_and_legacy() {
        let stored = r#"{"delta":{"ops":[{"insert":"Hi\n"}]},"html":"<p>Hi</p>"}"#;
        let parsed = RichText::parse(stored);
        assert_eq!(parsed.html, "<p>Hi</p>");
        assert_eq!(parsed.delta["ops"][0]["insert"], "Hi\n");

        let legacy = RichText::parse("<p>plain html</p>");
        assert_eq!(legacy.html, "<p>plain html</p>");
    }

    #[test]
    fn test_rich_text_json_round_trip() {
        let rich = RichText::from_html("<em>x</em>");
        assert_eq!(RichText::parse(&rich.to_json()), rich);
    }

    #[test]
    fn test_rich_text_deserializes_from_string_or_object() {
        let from_str: RichText = serde_json::from_str(r#""<p>A</p>""#).unwrap();
        assert_eq!(from_str.html, "<p>A</p>");

        let from_obj: RichText = serde_json::from_str(r#"{"html":"<p>B</p>"}"#).unwrap();
        assert_eq!(from_obj, RichText::from_html("<p>B</p>"));
    }

    #[test]
    fn test_field_value_is_tagged() {
        let json = serde_json::to_value(FieldValue::Plain("q".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "plain", "value": "q"}));
    }

    #[test]
    fn test_shadow_lookup() {
        let faq = sample();
        assert_eq!(
            faq.shadow(FaqField::Question, Language::BENGALI),
            Some(FieldValue::Plain("X কী?".to_string()))
        );
        assert_eq!(faq.shadow(FaqField::Question, Language::HINDI), None);
        // English has no shadow columns
        assert_eq!(faq.shadow(FaqField::Question, Language::ENGLISH), None);
    }

    #[test]
    fn test_empty_shadow_counts_as_missing() {
        let mut faq = sample();
        faq.question_hi = Some("  ".to_string());
        assert_eq!(faq.shadow(FaqField::Question, Language::HINDI), None);
    }

    #[test]
    fn test_set_shadow_checks_shape_and_language() {
        let mut faq = sample();

        assert!(faq.set_shadow(
            FaqField::Answer,
            Language::HINDI,
            FieldValue::Rich(RichText::from_html("<p>यह</p>"))
        ));
        assert!(!faq.set_shadow(
            FaqField::Answer,
            Language::HINDI,
            FieldValue::Plain("wrong shape".to_string())
        ));
        assert!(!faq.set_shadow(
            FaqField::Question,
            Language::ENGLISH,
            FieldValue::Plain("no column".to_string())
        ));
        assert_eq!(faq.answer_hi.unwrap().html, "<p>यह</p>");
    }

    #[test]
    fn test_changed_source_fields() {
        let faq = sample();

        let same = FaqUpdate {
            question: Some("What is X?".to_string()),
            answer: Some(RichText::from_html("<p>It is Y</p>")),
            ..FaqUpdate::default()
        };
        assert!(faq.changed_source_fields(&same).is_empty());

        let both = FaqUpdate {
            question: Some("What is Z?".to_string()),
            answer: Some(RichText::from_html("<p>It is Z</p>")),
            ..FaqUpdate::default()
        };
        assert_eq!(
            faq.changed_source_fields(&both),
            vec![FaqField::Question, FaqField::Answer]
        );

        // Flags alone change nothing translatable
        let flags = FaqUpdate {
            is_active: Some(false),
            ..FaqUpdate::default()
        };
        assert!(faq.changed_source_fields(&flags).is_empty());
    }

    #[test]
    fn test_apply_update() {
        let mut faq = sample();
        faq.apply(FaqUpdate {
            question: Some("New?".to_string()),
            question_bn: Some(String::new()),
            question_hi: Some("नया?".to_string()),
            is_active: Some(false),
            ..FaqUpdate::default()
        });

        assert_eq!(faq.question, "New?");
        assert_eq!(faq.question_bn, None);
        assert_eq!(faq.question_hi.as_deref(), Some("नया?"));
        assert!(!faq.is_active);
        assert!(faq.auto_translate);
    }

    #[test]
    fn test_provided_shadows() {
        let update = FaqUpdate {
            answer_bn: Some(RichText::from_html("<p>উত্তর</p>")),
            ..FaqUpdate::default()
        };
        assert_eq!(
            update.provided_shadows(),
            vec![(FaqField::Answer, Language::BENGALI)]
        );
        assert!(NewFaq::new("q", "<p>a</p>").provided_shadows().is_empty());
    }

    #[test]
    fn test_new_faq_validation() {
        assert!(NewFaq::new("q", "<p>a</p>").validate().is_ok());
        assert!(NewFaq::new(" ", "<p>a</p>").validate().is_err());
        assert!(NewFaq::new("q", "").validate().is_err());
    }

    #[test]
    fn test_new_faq_defaults_from_json() {
        let new: NewFaq =
            serde_json::from_str(r#"{"question":"q","answer":"<p>a</p>"}"#).unwrap();
        assert!(new.auto_translate);
        assert!(new.is_active);
        assert_eq!(new.answer.html, "<p>a</p>");
    }

    #[test]
    fn test_display_truncates_to_100_chars() {
        let mut faq = sample();
        faq.question = "ক".repeat(150);
        assert_eq!(faq.to_string().chars().count(), 100);
    }
}
