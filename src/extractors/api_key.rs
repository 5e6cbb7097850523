//! Require the configured API key in the `X-API-KEY` header.

use crate::config::API_KEY_HEADER;
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Proof that the request carried the expected API key. Used as a route layer on protected routes.
#[derive(Clone, Copy, Debug)]
pub struct ApiKey;

#[async_trait]
impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v: &axum::http::HeaderValue| v.to_str().ok());
        match provided {
            Some(key) if key == &*state.api_key => Ok(ApiKey),
            _ => {
                tracing::debug!(path = %parts.uri.path(), "rejected request without valid api key");
                Err(AppError::Unauthorized("Invalid or missing API key".into()))
            }
        }
    }
}
