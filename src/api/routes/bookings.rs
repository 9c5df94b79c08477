//! Booking Routes
//!
//! Drive one booking wizard per session id.
//!
//! - POST /api/v1/bookings - Start a booking session
//! - GET /api/v1/bookings/:id - Current wizard state
//! - DELETE /api/v1/bookings/:id - Abandon the session
//! - POST /api/v1/bookings/:id/date-time - Step one
//! - POST /api/v1/bookings/:id/table - Step two
//! - POST /api/v1/bookings/:id/details - Step three, creates the reservation
//! - POST /api/v1/bookings/:id/back - Previous step
//! - POST /api/v1/bookings/:id/reset - Start over

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::dto::{BookingResponse, DateTimeRequest, SelectTableRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::booking::{BookingId, BookingWorkflow, ContactDetails};

async fn find(state: &AppState, id: BookingId) -> ApiResult<Arc<Mutex<BookingWorkflow>>> {
    state
        .bookings
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Booking session {} not found", id)))
}

fn respond(booking_id: BookingId, workflow: &BookingWorkflow) -> Json<BookingResponse> {
    Json(BookingResponse {
        booking_id,
        view: workflow.view(),
    })
}

/// POST /api/v1/bookings
pub async fn start_booking(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<BookingResponse>) {
    let (booking_id, workflow) = state.bookings.start(&state.services).await;
    let workflow = workflow.lock().await;

    (StatusCode::CREATED, respond(booking_id, &workflow))
}

/// GET /api/v1/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<BookingResponse>> {
    let workflow = find(&state, id).await?;
    let workflow = workflow.lock().await;
    Ok(respond(id, &workflow))
}

/// DELETE /api/v1/bookings/:id
pub async fn abandon_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BookingId>,
) -> ApiResult<StatusCode> {
    if state.bookings.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Booking session {} not found", id)))
    }
}

/// POST /api/v1/bookings/:id/date-time
pub async fn select_date_time(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BookingId>,
    Json(req): Json<DateTimeRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let workflow = find(&state, id).await?;
    let mut workflow = workflow.lock().await;

    let party_size = req
        .party_size
        .unwrap_or(state.bookings.policy().default_party_size);
    workflow
        .select_date_time(&state.services, &req.date, &req.time_slot, party_size)
        .await?;

    Ok(respond(id, &workflow))
}

/// POST /api/v1/bookings/:id/table
pub async fn select_table(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BookingId>,
    Json(req): Json<SelectTableRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let workflow = find(&state, id).await?;
    let mut workflow = workflow.lock().await;

    workflow.select_table(&state.services, req.table_id).await?;
    Ok(respond(id, &workflow))
}

/// POST /api/v1/bookings/:id/details
pub async fn submit_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BookingId>,
    Json(contact): Json<ContactDetails>,
) -> ApiResult<Json<BookingResponse>> {
    let workflow = find(&state, id).await?;
    let mut workflow = workflow.lock().await;

    let created = workflow.submit_details(&state.services, contact).await?;
    tracing::info!(
        booking_id = %id,
        reservation_id = created.id,
        table_id = created.table_id,
        "Reservation created"
    );

    Ok(respond(id, &workflow))
}

/// POST /api/v1/bookings/:id/back
pub async fn go_back(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<BookingResponse>> {
    let workflow = find(&state, id).await?;
    let mut workflow = workflow.lock().await;

    workflow.back()?;
    Ok(respond(id, &workflow))
}

/// POST /api/v1/bookings/:id/reset
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<BookingResponse>> {
    let workflow = find(&state, id).await?;
    let mut workflow = workflow.lock().await;

    workflow.reset();
    Ok(respond(id, &workflow))
}
