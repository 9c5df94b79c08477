//! Reservation Repository
//!
//! The single authoritative source of tables and reservations. Callers hold an
//! `Arc<dyn ReservationRepository>` injected at start-up, so the in-memory
//! implementation can be swapped for a networked one without touching them.
//!
//! - **types**: Data model (Table, Reservation, TimeSlot, payloads)
//! - **memory**: In-memory implementation seeded at start-up
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use smita::repository::{InMemoryRepository, NewReservation, ReservationRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = InMemoryRepository::with_demo_data();
//!
//!     let created = repository
//!         .create_reservation(NewReservation {
//!             table_id: 1,
//!             customer_name: "A".into(),
//!             customer_email: "a@b.com".into(),
//!             customer_phone: "555".into(),
//!             date: "2025-02-01".parse()?,
//!             time_slot: "19:00".parse()?,
//!             party_size: 2,
//!         })
//!         .await?;
//!
//!     println!("Reservation {} is {}", created.id, created.status);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod types;

pub use error::{RepositoryError, RepositoryResult};
pub use memory::InMemoryRepository;
pub use types::{
    NewReservation, Reservation, ReservationId, ReservationStatus, ReservationUpdate, Table,
    TableId, TimeSlot,
};

use async_trait::async_trait;

/// Data service contract for tables and reservations
///
/// Writes return the authoritative post-write record; callers reconcile
/// their local state from it rather than from what they sent.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All tables in seed order
    async fn list_tables(&self) -> RepositoryResult<Vec<Table>>;

    /// All reservations in insertion order
    async fn list_reservations(&self) -> RepositoryResult<Vec<Reservation>>;

    /// One reservation by id
    async fn get_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation>;

    /// Store a new reservation: fresh id, `confirmed`, stamped with the creation time
    async fn create_reservation(&self, reservation: NewReservation) -> RepositoryResult<Reservation>;

    /// Apply a partial update to an existing reservation
    async fn update_reservation(
        &self,
        id: ReservationId,
        update: ReservationUpdate,
    ) -> RepositoryResult<Reservation>;

    /// Remove a reservation
    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<()>;
}
