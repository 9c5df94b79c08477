//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::SessionToken;
use crate::booking::{BookingId, BookingView};
use crate::dashboard::DashboardEntry;
use crate::menu::{MenuCategory, MenuItem};
use crate::repository::{ReservationStatus, Table, TableId, TimeSlot};
use crate::state::Notification;

// ============================================
// LOOKUP DTOs
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TableListResponse {
    pub tables: Vec<Table>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimeSlotsResponse {
    pub time_slots: Vec<TimeSlot>,
    pub max_party_size: u32,
    pub default_party_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    #[serde(default)]
    pub view: Option<String>,
}

// ============================================
// BOOKING DTOs
// ============================================

/// A booking session and its current state
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking_id: BookingId,
    #[serde(flatten)]
    pub view: BookingView,
}

/// Step one input; strings so that blank fields reach the wizard's own checks
#[derive(Debug, Deserialize)]
pub struct DateTimeRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time_slot: String,
    /// Defaults to the configured party size
    #[serde(default)]
    pub party_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SelectTableRequest {
    pub table_id: TableId,
}

// ============================================
// AUTH DTOs
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: SessionToken,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================
// ADMIN DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<DashboardEntry>,
    pub total: usize,
}

/// Status is the only field an admin may change
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateReservationRequest {
    pub status: ReservationStatus,
}

// ============================================
// NOTIFICATION DTOs
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub total: usize,
}

// ============================================
// MENU DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MenuResponse {
    /// `None` when showing every category
    pub category: Option<MenuCategory>,
    pub items: Vec<MenuItem>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MenuCategoriesResponse {
    pub categories: Vec<MenuCategory>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    pub repository: String,
    pub restaurant: String,
    pub reservations: usize,
    pub booking_sessions: usize,
    pub notifications: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
