//! In-memory repository
//!
//! Holds tables and reservations in process memory. Every call resolves
//! immediately; only update/delete of an unknown id fail.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryResult};
use super::types::{
    NewReservation, Reservation, ReservationId, ReservationStatus, ReservationUpdate, Table,
    TimeSlot,
};
use super::ReservationRepository;
use crate::ids::TimestampIds;

/// Repository backed by two in-memory lists
pub struct InMemoryRepository {
    tables: RwLock<Vec<Table>>,
    reservations: RwLock<Vec<Reservation>>,
    ids: TimestampIds,
}

impl InMemoryRepository {
    /// Create a repository over the given seed data
    pub fn new(tables: Vec<Table>, reservations: Vec<Reservation>) -> Self {
        let floor = reservations.iter().map(|r| r.id).max().unwrap_or(0);

        Self {
            tables: RwLock::new(tables),
            reservations: RwLock::new(reservations),
            ids: TimestampIds::starting_after(floor),
        }
    }

    /// The six demo tables and two demo reservations
    pub fn with_demo_data() -> Self {
        Self::new(demo_tables(), demo_reservations())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryRepository {
    async fn list_tables(&self) -> RepositoryResult<Vec<Table>> {
        Ok(self.tables.read().await.clone())
    }

    async fn list_reservations(&self) -> RepositoryResult<Vec<Reservation>> {
        Ok(self.reservations.read().await.clone())
    }

    async fn get_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation> {
        self.reservations
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn create_reservation(&self, reservation: NewReservation) -> RepositoryResult<Reservation> {
        let created_at = Utc::now();
        let id = self.ids.next();
        let stored = reservation.into_reservation(id, created_at);

        self.reservations.write().await.push(stored.clone());

        tracing::info!(
            reservation_id = stored.id,
            table_id = stored.table_id,
            date = %stored.date,
            time_slot = %stored.time_slot,
            party_size = stored.party_size,
            "Created reservation"
        );
        Ok(stored)
    }

    async fn update_reservation(
        &self,
        id: ReservationId,
        update: ReservationUpdate,
    ) -> RepositoryResult<Reservation> {
        let mut reservations = self.reservations.write().await;
        let record = reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        update.apply(record);

        tracing::info!(reservation_id = id, status = %record.status, "Updated reservation");
        Ok(record.clone())
    }

    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<()> {
        let mut reservations = self.reservations.write().await;
        let index = reservations
            .iter()
            .position(|r| r.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        reservations.remove(index);

        tracing::info!(reservation_id = id, "Deleted reservation");
        Ok(())
    }
}

/// Demo dining room
pub fn demo_tables() -> Vec<Table> {
    vec![
        Table::new(1, "Table 1", 2, "Window"),
        Table::new(2, "Table 2", 4, "Main Floor"),
        Table::new(3, "Table 3", 6, "Private Room").unavailable(),
        Table::new(4, "Table 4", 2, "Bar Area"),
        Table::new(5, "Table 5", 8, "Private Room"),
        Table::new(6, "Table 6", 4, "Patio"),
    ]
}

/// Demo bookings for the 15th of January 2025 (19:00 and 20:00)
pub fn demo_reservations() -> Vec<Reservation> {
    let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap_or_default();
    let (Some(seven_pm), Some(eight_pm)) = (TimeSlot::new(19, 0), TimeSlot::new(20, 0)) else {
        return Vec::new();
    };

    vec![
        Reservation {
            id: 1,
            table_id: 3,
            customer_name: "John Doe".to_string(),
            customer_email: "john@example.com".to_string(),
            customer_phone: "555-1234".to_string(),
            date,
            time_slot: seven_pm,
            party_size: 4,
            status: ReservationStatus::Confirmed,
            created_at: Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).single().unwrap_or_default(),
        },
        Reservation {
            id: 2,
            table_id: 2,
            customer_name: "Jane Smith".to_string(),
            customer_email: "jane@example.com".to_string(),
            customer_phone: "555-5678".to_string(),
            date,
            time_slot: eight_pm,
            party_size: 2,
            status: ReservationStatus::Confirmed,
            created_at: Utc.with_ymd_and_hms(2025, 1, 10, 11, 0, 0).single().unwrap_or_default(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn booking() -> NewReservation {
        NewReservation {
            table_id: 1,
            customer_name: "A".to_string(),
            customer_email: "a@b.com".to_string(),
            customer_phone: "555".to_string(),
            date: "2025-02-01".parse().unwrap(),
            time_slot: "19:00".parse().unwrap(),
            party_size: 2,
        }
    }

    #[tokio::test]
    async fn test_demo_data() {
        let repo = InMemoryRepository::with_demo_data();
        let tables = repo.list_tables().await.unwrap();
        let reservations = repo.list_reservations().await.unwrap();

        assert_eq!(tables.len(), 6);
        assert_eq!(tables.iter().filter(|t| !t.available).count(), 1);
        assert_eq!(reservations.len(), 2);

        let seeded: Vec<(u32, String)> = reservations
            .iter()
            .map(|r| (r.table_id, r.time_slot.to_string()))
            .collect();
        assert_eq!(seeded, vec![(3, "19:00".to_string()), (2, "20:00".to_string())]);
    }

    #[tokio::test]
    async fn test_create_is_confirmed_with_fresh_id() {
        let repo = InMemoryRepository::with_demo_data();
        let existing: HashSet<ReservationId> = repo
            .list_reservations()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();

        let call_time = Utc::now();
        let created = repo.create_reservation(booking()).await.unwrap();

        assert_eq!(created.status, ReservationStatus::Confirmed);
        assert!(created.created_at >= call_time);
        assert!(!existing.contains(&created.id));
        assert_eq!(created.customer_name, "A");
        assert_eq!(created.time_slot.to_string(), "19:00");
        assert_eq!(created.party_size, 2);
        assert_eq!(created.table_id, 1);

        let stored = repo.get_reservation(created.id).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_back_to_back_creates_get_distinct_ids() {
        let repo = InMemoryRepository::new(demo_tables(), Vec::new());
        let first = repo.create_reservation(booking()).await.unwrap();
        let second = repo.create_reservation(booking()).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(repo.list_reservations().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_returns_authoritative_record() {
        let repo = InMemoryRepository::with_demo_data();
        let updated = repo
            .update_reservation(1, ReservationUpdate::status(ReservationStatus::Cancelled))
            .await
            .unwrap();

        assert_eq!(updated.status, ReservationStatus::Cancelled);
        assert_eq!(updated.customer_name, "John Doe");
        assert_eq!(repo.get_reservation(1).await.unwrap().status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repo = InMemoryRepository::with_demo_data();
        let result = repo
            .update_reservation(999, ReservationUpdate::status(ReservationStatus::Pending))
            .await;
        assert_eq!(result, Err(RepositoryError::NotFound(999)));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryRepository::with_demo_data();
        repo.delete_reservation(1).await.unwrap();

        let remaining = repo.list_reservations().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_leaves_data_unchanged() {
        let repo = InMemoryRepository::with_demo_data();
        let before = repo.list_reservations().await.unwrap();

        let result = repo.delete_reservation(12345).await;

        assert_eq!(result, Err(RepositoryError::NotFound(12345)));
        assert_eq!(repo.list_reservations().await.unwrap(), before);
    }
}
