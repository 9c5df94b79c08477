//! Lookup Routes
//!
//! - GET /api/v1/tables - Every table with capacity and availability
//! - GET /api/v1/time-slots - Bookable slots and party-size limits
//! - GET /api/v1/navigation?view= - Resolve a view against the caller's session

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{NavigationQuery, TableListResponse, TimeSlotsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AdminSession;
use crate::api::state::AppState;
use crate::shell::{Navigation, View};

/// GET /api/v1/tables
pub async fn list_tables(State(state): State<Arc<AppState>>) -> ApiResult<Json<TableListResponse>> {
    let tables = state.services.repository.list_tables().await?;

    Ok(Json(TableListResponse {
        total: tables.len(),
        tables,
    }))
}

/// GET /api/v1/time-slots
pub async fn list_time_slots(State(state): State<Arc<AppState>>) -> Json<TimeSlotsResponse> {
    let policy = state.bookings.policy();

    Json(TimeSlotsResponse {
        time_slots: policy.time_slots.clone(),
        max_party_size: policy.max_party_size,
        default_party_size: policy.default_party_size,
    })
}

/// GET /api/v1/navigation
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    session: Option<AdminSession>,
    Query(query): Query<NavigationQuery>,
) -> ApiResult<Json<Navigation>> {
    let view = match query.view.as_deref() {
        Some(raw) => raw.parse::<View>().map_err(ApiError::Validation)?,
        None => View::default(),
    };
    let token = session.map(|AdminSession(s)| s.token);

    Ok(Json(state.shell.navigate(view, token).await))
}
