//! Notification Routes
//!
//! - GET /api/v1/notifications - Current notifications in display order
//! - DELETE /api/v1/notifications/:id - Dismiss one
//!
//! The list is process-wide: every client sees every notification and any
//! client may dismiss one. No session is required.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::NotificationListResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::state::NotificationId;

/// GET /api/v1/notifications
pub async fn list_notifications(State(state): State<Arc<AppState>>) -> Json<NotificationListResponse> {
    let notifications = state.services.notifications.list().await;

    Json(NotificationListResponse {
        total: notifications.len(),
        notifications,
    })
}

/// DELETE /api/v1/notifications/:id
pub async fn dismiss_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<NotificationId>,
) -> ApiResult<StatusCode> {
    if state.services.notifications.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Notification {} not found", id)))
    }
}
