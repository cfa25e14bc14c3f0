use super::TranslationProvider;
use crate::config::Config;
use crate::i18n::Language;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Google Translate's public `translate_a/single` endpoint.
///
/// The response is a nested JSON array whose first element lists the
/// translated segments: `[[["translated", "original", ...], ...], ...]`.
pub struct GoogleTranslateProvider {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslateProvider {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.translate_timeout_secs))
            .build()
            .context("Failed to build translation HTTP client")?;
        Ok(Self::new(client, config.translate_api_url.clone()))
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("client", "gtx"),
                ("sl", source.code()),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .context("Failed to send request to translation API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            anyhow::bail!("Translation API error ({}): {}", status, body);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse translation API response")?;

        parse_translation(&body)
    }
}

/// Join the translated segments of a `translate_a/single` response.
fn parse_translation(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .context("Translation API response has no segment list")?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        anyhow::bail!("Translation API response contained no translated text");
    }

    Ok(translated)
}
