//! Admin Routes
//!
//! Management dashboard endpoints. Every handler requires a bearer token.
//!
//! - GET /api/v1/admin/dashboard?date= - Stats and the day's reservations
//! - GET /api/v1/admin/reservations - Every reservation
//! - PATCH /api/v1/admin/reservations/:id - Change a reservation's status
//! - DELETE /api/v1/admin/reservations/:id - Delete a reservation
//! - GET /api/v1/admin/tables - Table list

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{
    DashboardQuery, ReservationListResponse, TableListResponse, UpdateReservationRequest,
};
use crate::api::error::ApiResult;
use crate::api::extract::AdminSession;
use crate::api::state::AppState;
use crate::dashboard::DashboardSummary;
use crate::repository::{Reservation, ReservationId};

/// GET /api/v1/admin/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    AdminSession(session): AdminSession,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardSummary>> {
    let dashboard = state.shell.admin_dashboard(session.token).await?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let summary = dashboard.lock().await.summary(&state.services, date).await;
    Ok(Json(summary))
}

/// GET /api/v1/admin/reservations
pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    AdminSession(session): AdminSession,
) -> ApiResult<Json<ReservationListResponse>> {
    let dashboard = state.shell.admin_dashboard(session.token).await?;
    let reservations = dashboard.lock().await.reservations(&state.services).await;

    Ok(Json(ReservationListResponse {
        total: reservations.len(),
        reservations,
    }))
}

/// PATCH /api/v1/admin/reservations/:id
pub async fn update_reservation(
    State(state): State<Arc<AppState>>,
    AdminSession(session): AdminSession,
    Path(id): Path<ReservationId>,
    Json(req): Json<UpdateReservationRequest>,
) -> ApiResult<Json<Reservation>> {
    let dashboard = state.shell.admin_dashboard(session.token).await?;
    let updated = dashboard
        .lock()
        .await
        .update_status(&state.services, id, req.status)
        .await?;

    tracing::info!(reservation_id = id, status = %updated.status, admin = %session.email, "Reservation status changed");
    Ok(Json(updated))
}

/// DELETE /api/v1/admin/reservations/:id
pub async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    AdminSession(session): AdminSession,
    Path(id): Path<ReservationId>,
) -> ApiResult<StatusCode> {
    let dashboard = state.shell.admin_dashboard(session.token).await?;
    dashboard
        .lock()
        .await
        .delete_reservation(&state.services, id)
        .await?;

    tracing::info!(reservation_id = id, admin = %session.email, "Reservation deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/tables
pub async fn list_tables(
    State(state): State<Arc<AppState>>,
    AdminSession(session): AdminSession,
) -> ApiResult<Json<TableListResponse>> {
    let dashboard = state.shell.admin_dashboard(session.token).await?;
    let tables = dashboard.lock().await.tables().to_vec();

    Ok(Json(TableListResponse {
        total: tables.len(),
        tables,
    }))
}
