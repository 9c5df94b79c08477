//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (repository answers)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the reservation repository answers.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if check_repository_health(&state).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// The reservation count comes from the repository; the shared store only
/// fills once a dashboard mounts.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let reservations = match state.services.repository.list_reservations().await {
        Ok(reservations) => Some(reservations.len()),
        Err(e) => {
            tracing::warn!(error = %e, "Repository health check failed");
            None
        }
    };
    let repository_ok = reservations.is_some() && check_repository_health(&state).await;

    Json(HealthResponse {
        status: if repository_ok { "healthy" } else { "degraded" }.to_string(),
        repository: if repository_ok { "ok" } else { "error" }.to_string(),
        restaurant: state.config.restaurant_name.clone(),
        reservations: reservations.unwrap_or(0),
        booking_sessions: state.bookings.len().await,
        notifications: state.services.notifications.len().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn check_repository_health(state: &AppState) -> bool {
    match state.services.repository.list_tables().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Repository health check failed");
            false
        }
    }
}
