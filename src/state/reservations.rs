//! Reservation Store
//!
//! Process-wide list of reservation records, keyed by id. Workflows feed it
//! only with records returned by the repository, so it mirrors the
//! authoritative source instead of drifting from it.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::repository::{Reservation, ReservationId, ReservationUpdate};

/// Shared list of reservation records
#[derive(Clone, Default)]
pub struct ReservationStore {
    records: Arc<RwLock<Vec<Reservation>>>,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub async fn add(&self, record: Reservation) {
        self.records.write().await.push(record);
    }

    /// Apply a partial update to the record with `id`
    ///
    /// Returns the updated record, or `None` if no record has that id.
    pub async fn update(&self, id: ReservationId, update: &ReservationUpdate) -> Option<Reservation> {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|r| r.id == id)?;
        update.apply(record);
        Some(record.clone())
    }

    /// Remove the record with `id`; false if there was none
    pub async fn delete(&self, id: ReservationId) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        records.len() != before
    }

    /// Replace the record with the same id by an authoritative copy,
    /// appending it if the store has not seen it yet
    pub async fn reconcile(&self, record: Reservation) {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Load a full authoritative snapshot
    pub async fn replace_all(&self, records: Vec<Reservation>) {
        *self.records.write().await = records;
    }

    pub async fn get(&self, id: ReservationId) -> Option<Reservation> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Snapshot in insertion order
    pub async fn list(&self) -> Vec<Reservation> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::demo_reservations;
    use crate::repository::ReservationStatus;

    async fn seeded() -> ReservationStore {
        let store = ReservationStore::new();
        for record in demo_reservations() {
            store.add(record).await;
        }
        store
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let store = seeded().await;
        assert_eq!(store.len().await, 2);
        assert_eq!(store.get(2).await.unwrap().customer_name, "Jane Smith");
        assert!(store.get(3).await.is_none());
    }

    #[tokio::test]
    async fn test_update_by_id() {
        let store = seeded().await;
        let updated = store
            .update(1, &ReservationUpdate::status(ReservationStatus::Pending))
            .await
            .unwrap();

        assert_eq!(updated.status, ReservationStatus::Pending);
        assert_eq!(store.get(1).await.unwrap().status, ReservationStatus::Pending);
        assert_eq!(store.get(2).await.unwrap().status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = seeded().await;
        let before = store.list().await;
        assert!(store
            .update(99, &ReservationUpdate::status(ReservationStatus::Cancelled))
            .await
            .is_none());
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = seeded().await;
        assert!(store.delete(1).await);
        assert!(!store.delete(1).await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_reconcile_replaces_or_appends() {
        let store = seeded().await;

        let mut authoritative = store.get(2).await.unwrap();
        authoritative.status = ReservationStatus::Cancelled;
        store.reconcile(authoritative).await;
        assert_eq!(store.len().await, 2);
        assert_eq!(store.get(2).await.unwrap().status, ReservationStatus::Cancelled);

        let mut fresh = store.get(1).await.unwrap();
        fresh.id = 77;
        store.reconcile(fresh).await;
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_replace_all() {
        let store = seeded().await;
        store.replace_all(Vec::new()).await;
        assert!(store.is_empty().await);
    }
}
