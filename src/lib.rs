//! # Smita
//!
//! Restaurant reservations: a three-step booking wizard for customers, an
//! authenticated management dashboard for staff and a static menu catalog,
//! served as a JSON API.
//!
//! ## Modules
//!
//! - [`repository`]: reservation data service contract and in-memory implementation
//! - [`state`]: shared notification and reservation stores
//! - [`booking`]: booking wizard and per-customer sessions
//! - [`auth`]: credential checking and admin sessions
//! - [`dashboard`]: reservation management for staff
//! - [`shell`]: view navigation and login plumbing
//! - [`menu`]: menu catalog
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smita::booking::{BookingSessions, BookingPolicy, ContactDetails};
//! use smita::services::Services;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let services = Services::in_memory();
//!     let sessions = BookingSessions::new(BookingPolicy::default(), Duration::from_secs(1800));
//!
//!     let (_, workflow) = sessions.start(&services).await;
//!     let mut workflow = workflow.lock().await;
//!
//!     workflow.select_date_time(&services, "2030-06-01", "19:00", 2).await?;
//!     let table = workflow.candidate_tables()[0].id;
//!     workflow.select_table(&services, table).await?;
//!
//!     let reservation = workflow
//!         .submit_details(
//!             &services,
//!             ContactDetails {
//!                 customer_name: "Ada".into(),
//!                 customer_email: "ada@example.com".into(),
//!                 customer_phone: "555-0101".into(),
//!             },
//!         )
//!         .await?;
//!
//!     println!("Reservation {} confirmed", reservation.id);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod booking;
pub mod config;
pub mod dashboard;
pub mod ids;
pub mod menu;
pub mod repository;
pub mod services;
pub mod shell;
pub mod state;

// Re-export commonly used types at crate root
pub use auth::{AdminAccount, Authenticator, CredentialAuthenticator, Session, SessionEvent};
pub use booking::{BookingError, BookingSessions, BookingStep, BookingWorkflow};
pub use dashboard::{Dashboard, DashboardSummary};
pub use menu::{MenuCatalog, MenuCategory, MenuItem};
pub use repository::{
    InMemoryRepository, NewReservation, RepositoryError, Reservation, ReservationRepository,
    ReservationStatus, Table, TimeSlot,
};
pub use services::Services;
pub use shell::{Navigation, Shell, View};
pub use state::{Notification, NotificationStore, ReservationStore, Severity};
