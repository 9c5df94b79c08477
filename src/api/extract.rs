//! Session extractor
//!
//! Pulls the admin session out of an `Authorization: Bearer <token>` header.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::auth::{Session, SessionToken};

/// A live admin session; rejects with 401 otherwise
///
/// Use `Option<AdminSession>` where a session is optional.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

/// Parse the bearer token, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?;
    token.trim().parse().ok()
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing or malformed bearer token".to_string()))?;

        state
            .shell
            .authenticator()
            .session(token)
            .await
            .map(AdminSession)
            .ok_or_else(|| ApiError::Unauthorized("Session is unknown or has expired".to_string()))
    }
}
