//! Injected collaborators
//!
//! The booking workflow and the dashboard receive their repository and
//! stores through this bundle instead of reaching for globals.

use std::sync::Arc;

use crate::repository::{InMemoryRepository, ReservationRepository};
use crate::state::{NotificationStore, ReservationStore};

/// Repository plus the two shared stores
#[derive(Clone)]
pub struct Services {
    pub repository: Arc<dyn ReservationRepository>,
    pub reservations: ReservationStore,
    pub notifications: NotificationStore,
}

impl Services {
    pub fn new(
        repository: Arc<dyn ReservationRepository>,
        reservations: ReservationStore,
        notifications: NotificationStore,
    ) -> Self {
        Self {
            repository,
            reservations,
            notifications,
        }
    }

    /// Demo repository with empty stores, for tests and local runs
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRepository::with_demo_data()),
            ReservationStore::new(),
            NotificationStore::default(),
        )
    }
}
