//! Auth Routes
//!
//! - POST /api/v1/auth/login - Exchange credentials for a bearer token
//! - POST /api/v1/auth/logout - End the caller's session
//! - GET /api/v1/auth/session - Describe the caller's session

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{LoginRequest, LoginResponse};
use crate::api::error::ApiResult;
use crate::api::extract::AdminSession;
use crate::api::state::AppState;
use crate::auth::Session;

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state.shell.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        email: session.email,
        expires_at: session.expires_at,
    }))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    AdminSession(session): AdminSession,
) -> ApiResult<StatusCode> {
    state.shell.logout(session.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
pub async fn current_session(AdminSession(session): AdminSession) -> Json<Session> {
    Json(session)
}
