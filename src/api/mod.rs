//! Smita REST API
//!
//! HTTP API layer for the reservation service, built with Axum.
//!
//! # Endpoints
//!
//! ## Lookups
//! - `GET /api/v1/tables` - Tables with capacity and availability
//! - `GET /api/v1/time-slots` - Bookable slots and party-size limits
//! - `GET /api/v1/navigation?view=` - Resolve a view against the caller's session
//!
//! ## Booking
//! - `POST /api/v1/bookings` - Start a booking session
//! - `GET /api/v1/bookings/:id` - Current wizard state
//! - `DELETE /api/v1/bookings/:id` - Abandon the session
//! - `POST /api/v1/bookings/:id/date-time` - Choose date, slot and party size
//! - `POST /api/v1/bookings/:id/table` - Choose a table
//! - `POST /api/v1/bookings/:id/details` - Submit contact details
//! - `POST /api/v1/bookings/:id/back` - Previous step
//! - `POST /api/v1/bookings/:id/reset` - Start over
//!
//! ## Auth
//! - `POST /api/v1/auth/login`, `POST /api/v1/auth/logout`, `GET /api/v1/auth/session`
//!
//! ## Admin (bearer token)
//! - `GET /api/v1/admin/dashboard?date=` - Stats and the day's reservations
//! - `GET /api/v1/admin/reservations` - Every reservation
//! - `PATCH /api/v1/admin/reservations/:id` - Change status
//! - `DELETE /api/v1/admin/reservations/:id` - Delete
//! - `GET /api/v1/admin/tables` - Table list
//!
//! ## Notifications
//! - `GET /api/v1/notifications`, `DELETE /api/v1/notifications/:id`
//!
//! ## Menu
//! - `GET /api/v1/menu?category=`, `GET /api/v1/menu/categories`, `GET /api/v1/menu/:id`
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use smita::api::{serve, AppState};
//! use smita::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let state = AppState::from_config(&config)?;
//!     let api_config = state.config.as_ref().clone();
//!
//!     serve(state, &api_config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::AdminSession;
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Lookups
        .route("/tables", get(routes::tables::list_tables))
        .route("/time-slots", get(routes::tables::list_time_slots))
        .route("/navigation", get(routes::tables::navigate))
        // Booking wizard
        .route("/bookings", post(routes::bookings::start_booking))
        .route(
            "/bookings/:id",
            get(routes::bookings::get_booking).delete(routes::bookings::abandon_booking),
        )
        .route("/bookings/:id/date-time", post(routes::bookings::select_date_time))
        .route("/bookings/:id/table", post(routes::bookings::select_table))
        .route("/bookings/:id/details", post(routes::bookings::submit_details))
        .route("/bookings/:id/back", post(routes::bookings::go_back))
        .route("/bookings/:id/reset", post(routes::bookings::reset))
        // Auth
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/session", get(routes::auth::current_session))
        // Admin dashboard
        .route("/admin/dashboard", get(routes::admin::dashboard))
        .route("/admin/reservations", get(routes::admin::list_reservations))
        .route(
            "/admin/reservations/:id",
            axum::routing::patch(routes::admin::update_reservation)
                .delete(routes::admin::delete_reservation),
        )
        .route("/admin/tables", get(routes::admin::list_tables))
        // Notifications
        .route("/notifications", get(routes::notifications::list_notifications))
        .route(
            "/notifications/:id",
            axum::routing::delete(routes::notifications::dismiss_notification),
        )
        // Menu
        .route("/menu", get(routes::menu::list_menu))
        .route("/menu/categories", get(routes::menu::list_categories))
        .route("/menu/:id", get(routes::menu::get_item));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let timeout = state.config.request_timeout;
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // Configure properly in production
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("{} API listening on {}", config.restaurant_name, addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
