use super::auth::require_admin;
use super::ApiError;
use crate::faq::{AdminFaq, FaqUpdate, NewFaq, PublicFaq};
use crate::i18n::Language;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    fn language(&self) -> Language {
        Language::from_param(self.lang.as_deref())
    }
}

/// GET /api/faqs?lang=xx
pub async fn list_faqs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<PublicFaq>>, ApiError> {
    let faqs = state.listing.list(query.language()).await?;
    Ok(Json(faqs))
}

/// GET /api/faqs/by_language
pub async fn faqs_by_language(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Vec<PublicFaq>>>, ApiError> {
    let grouped = state.listing.by_language().await?;
    Ok(Json(grouped))
}

/// GET /api/faqs/:id?lang=xx
pub async fn get_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<LangQuery>,
) -> Result<Json<PublicFaq>, ApiError> {
    let mut faq = state
        .faqs
        .get(id)
        .await?
        .filter(|faq| faq.is_active)
        .ok_or_else(|| ApiError::faq_not_found(id))?;

    Ok(Json(state.faqs.to_public(&mut faq, query.language()).await))
}

/// POST /api/faqs
pub async fn create_faq(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<NewFaq>,
) -> Result<(StatusCode, Json<AdminFaq>), ApiError> {
    require_admin(state.config.api_key.as_deref(), &headers)?;
    payload
        .validate()
        .map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    let faq = state.faqs.create(payload).await?;
    Ok((StatusCode::CREATED, Json(AdminFaq::from(faq))))
}

/// PUT|PATCH /api/faqs/:id
pub async fn update_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<FaqUpdate>,
) -> Result<Json<AdminFaq>, ApiError> {
    require_admin(state.config.api_key.as_deref(), &headers)?;
    if payload.question.as_ref().is_some_and(|q| q.trim().is_empty()) {
        return Err(ApiError::BadRequest("question must not be empty".to_string()));
    }
    if payload.answer.as_ref().is_some_and(|a| a.is_empty()) {
        return Err(ApiError::BadRequest("answer must not be empty".to_string()));
    }

    let faq = state
        .faqs
        .update(id, payload)
        .await?
        .ok_or_else(|| ApiError::faq_not_found(id))?;
    Ok(Json(AdminFaq::from(faq)))
}

/// DELETE /api/faqs/:id
pub async fn delete_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(state.config.api_key.as_deref(), &headers)?;

    if state.faqs.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::faq_not_found(id))
    }
}
