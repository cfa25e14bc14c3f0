use super::ApiError;
use crate::security::constant_time_compare;
use axum::http::HeaderMap;

/// Pull the admin key from `X-API-Key` or `Authorization: Bearer`.
fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers.get("X-API-Key").and_then(|v| v.to_str().ok()) {
        return Some(key.trim());
    }

    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Admin writes are refused outright when no key is configured.
pub fn require_admin(configured: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = configured else {
        return Err(ApiError::Unauthorized);
    };

    match extract_api_key(headers) {
        Some(provided) if constant_time_compare(provided, expected) => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}
