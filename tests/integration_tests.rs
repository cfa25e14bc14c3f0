//! Integration tests for the FAQ service
//!
//! These tests run the full HTTP stack on an ephemeral port, backed by an
//! in-memory SQLite database, the in-process cache and a mocked translation
//! endpoint.

use faq_service::{api, config::Config, faq::PublicFaq, state::AppState};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio::net::TcpListener;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, Respond, ResponseTemplate,
};

const API_KEY: &str = "test-api-key";

// ==================== Test Helpers ====================

/// Answers like the Google endpoint, translating `q` to `"{tl}:{q}"`.
struct EchoTranslator;

impl Respond for EchoTranslator {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let param = |name: &str| {
            request
                .url
                .query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default()
        };
        let translated = format!("{}:{}", param("tl"), param("q"));
        ResponseTemplate::new(200).set_body_json(json!([[[translated, param("q"), null, null, 3]], null, "en"]))
    }
}

/// Create a test config pointing at the mocked translation endpoint
fn create_test_config(translate_url: &str) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        redis_url: None,
        redis_key_prefix: String::new(),
        memory_cache_capacity: 1024,
        cache_ttl_secs: 900,
        translation_cache_ttl_secs: 86_400,
        translate_api_url: translate_url.to_string(),
        translate_timeout_secs: 5,
        translation_max_attempts: 3,
        translation_retry_delay_ms: 5,
        api_key: Some(API_KEY.to_string()),
        port: 0,
    }
}

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    translator: MockServer,
}

impl TestApp {
    async fn start_with(translator: MockServer) -> Self {
        let config = create_test_config(&format!("{}/translate_a/single", translator.uri()));
        let state = AppState::from_config(config).await.expect("Failed to build state");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(api::serve(listener, state));

        Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            translator,
        }
    }

    async fn start() -> Self {
        let translator = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(EchoTranslator)
            .mount(&translator)
            .await;
        Self::start_with(translator).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, body: Value) -> Value {
        let response = self
            .client
            .post(self.url("/api/faqs"))
            .header("X-API-Key", API_KEY)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        response.json().await.unwrap()
    }

    async fn list(&self, lang: &str) -> Vec<PublicFaq> {
        self.client
            .get(self.url(&format!("/api/faqs?lang={}", lang)))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

// ==================== Tests ====================

#[tokio::test]
async fn test_health() {
    let app = TestApp::start().await;

    let body: Value = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_create_update_list_end_to_end() {
    let app = TestApp::start().await;

    let created = app
        .create(json!({"question": "What is X?", "answer": "<p>It is Y</p>"}))
        .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["question_hi"], "hi:What is X?");
    assert_eq!(created["answer_bn"]["html"], "bn:<p>It is Y</p>");
    assert!(created["last_translated"].is_string());

    let hindi = app.list("hi").await;
    assert_eq!(hindi.len(), 1);
    assert_eq!(hindi[0].question, "hi:What is X?");
    assert_eq!(hindi[0].answer, "hi:<p>It is Y</p>");

    let response = app
        .client
        .put(app.url(&format!("/api/faqs/{}", id)))
        .header("Authorization", format!("Bearer {}", API_KEY))
        .json(&json!({"question": "What is Z?"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Both the English and the translated listing reflect the edit
    assert_eq!(app.list("en").await[0].question, "What is Z?");
    let hindi = app.list("hi").await;
    assert_eq!(hindi[0].question, "hi:What is Z?");
    assert_eq!(hindi[0].answer, "hi:<p>It is Y</p>");
}

#[tokio::test]
async fn test_by_language_groups_all_languages() {
    let app = TestApp::start().await;
    app.create(json!({"question": "What is X?", "answer": "<p>Y</p>"}))
        .await;

    let grouped: BTreeMap<String, Vec<PublicFaq>> = app
        .client
        .get(app.url("/api/faqs/by_language"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(grouped.len(), 3);
    assert_eq!(grouped["en"][0].question, "What is X?");
    assert_eq!(grouped["hi"][0].question, "hi:What is X?");
    assert_eq!(grouped["bn"][0].question, "bn:What is X?");
}

#[tokio::test]
async fn test_unknown_language_falls_back_to_english() {
    let app = TestApp::start().await;
    app.create(json!({"question": "What is X?", "answer": "<p>Y</p>"}))
        .await;

    let listing = app.list("fr").await;

    assert_eq!(listing[0].question, "What is X?");
}

#[tokio::test]
async fn test_retrieve_and_delete() {
    let app = TestApp::start().await;
    let created = app
        .create(json!({
            "question": "What is X?",
            "answer": {"delta": {"ops": [{"insert": "Y\n"}]}, "html": "<p>Y</p>"}
        }))
        .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["answer"]["delta"]["ops"][0]["insert"], "Y\n");

    let single: PublicFaq = app
        .client
        .get(app.url(&format!("/api/faqs/{}?lang=bn", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(single.question, "bn:What is X?");

    let response = app
        .client
        .delete(app.url(&format!("/api/faqs/{}", id)))
        .header("X-API-Key", API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = app
        .client
        .get(app.url(&format!("/api/faqs/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert!(app.list("en").await.is_empty());

    let response = app
        .client
        .delete(app.url(&format!("/api/faqs/{}", id)))
        .header("X-API-Key", API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_inactive_faq_is_hidden() {
    let app = TestApp::start().await;
    let created = app
        .create(json!({"question": "Hidden?", "answer": "<p>h</p>", "is_active": false}))
        .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .client
        .get(app.url(&format!("/api/faqs/{}", id)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert!(app.list("en").await.is_empty());
}

#[tokio::test]
async fn test_writes_require_api_key() {
    let app = TestApp::start().await;
    let body = json!({"question": "What is X?", "answer": "<p>Y</p>"});

    let missing = app
        .client
        .post(app.url("/api/faqs"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let wrong = app
        .client
        .post(app.url("/api/faqs"))
        .header("X-API-Key", "wrong-key")
        .json(&body)
        .send()
        .await
        .unwrap();
    let delete = app
        .client
        .delete(app.url("/api/faqs/1"))
        .send()
        .await
        .unwrap();

    assert_eq!(missing.status(), 401);
    assert_eq!(wrong.status(), 401);
    assert_eq!(delete.status(), 401);
    assert!(app.list("en").await.is_empty());
}

#[tokio::test]
async fn test_create_rejects_empty_question() {
    let app = TestApp::start().await;

    let response = app
        .client
        .post(app.url("/api/faqs"))
        .header("X-API-Key", API_KEY)
        .json(&json!({"question": "  ", "answer": "<p>Y</p>"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_translation_outage_serves_english() {
    let translator = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&translator)
        .await;
    let app = TestApp::start_with(translator).await;

    let created = app
        .create(json!({"question": "What is X?", "answer": "<p>Y</p>"}))
        .await;
    assert!(created["question_hi"].is_null());
    assert!(created["last_translated"].is_null());

    let hindi = app.list("hi").await;
    assert_eq!(hindi[0].question, "What is X?");
    assert_eq!(hindi[0].answer, "<p>Y</p>");

    // Every failed pair was retried the configured number of times
    let requests = app.translator.received_requests().await.unwrap();
    assert!(requests.len() >= 4 * 3);
}
