//! HTTP surface: public reads, key-protected admin writes.

mod auth;
mod error;
mod faqs;

pub use error::ApiError;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/faqs", get(faqs::list_faqs).post(faqs::create_faq))
        .route("/faqs/by_language", get(faqs::faqs_by_language))
        .route(
            "/faqs/:id",
            get(faqs::get_faq)
                .put(faqs::update_faq)
                .patch(faqs::update_faq)
                .delete(faqs::delete_faq),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Serve the API on an already-bound listener until the process stops.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .context("HTTP server failed")
}
