//! Management Dashboard
//!
//! Admin-side view of reservations and tables. Reservations are read from the
//! shared [`ReservationStore`](crate::state::ReservationStore); every change
//! goes through the repository first and the store is reconciled with the
//! record the repository returns.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::repository::{
    RepositoryError, Reservation, ReservationId, ReservationStatus, ReservationUpdate, Table, TableId,
};
use crate::services::Services;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Error loading data: {0}")]
    Load(#[source] RepositoryError),

    #[error("Failed to update reservation {id}: {source}")]
    Update {
        id: ReservationId,
        #[source]
        source: RepositoryError,
    },

    #[error("Failed to delete reservation {id}: {source}")]
    Delete {
        id: ReservationId,
        #[source]
        source: RepositoryError,
    },
}

impl DashboardError {
    /// The repository failure underneath
    pub fn repository_error(&self) -> &RepositoryError {
        match self {
            DashboardError::Load(source)
            | DashboardError::Update { source, .. }
            | DashboardError::Delete { source, .. } => source,
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// A reservation row with its table's display name
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardEntry {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub table_name: Option<String>,
}

/// Headline numbers plus the reservations on one date
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    /// Reservations on `date`, ordered by time slot
    pub reservations: Vec<DashboardEntry>,
    pub total_reservations: usize,
    pub confirmed_reservations: usize,
    pub total_guests: u32,
    pub available_tables: usize,
    pub total_tables: usize,
}

/// One admin's dashboard
#[derive(Debug, Default)]
pub struct Dashboard {
    tables: Vec<Table>,
    loaded: bool,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Load reservations and tables the first time the dashboard is shown
    pub async fn mount(&mut self, services: &Services) -> DashboardResult<()> {
        if self.loaded {
            return Ok(());
        }
        self.refresh(services).await
    }

    /// Reload reservations and tables from the repository
    pub async fn refresh(&mut self, services: &Services) -> DashboardResult<()> {
        let loaded = async {
            let reservations = services.repository.list_reservations().await?;
            let tables = services.repository.list_tables().await?;
            Ok::<_, RepositoryError>((reservations, tables))
        }
        .await;

        match loaded {
            Ok((reservations, tables)) => {
                tracing::debug!(
                    reservations = reservations.len(),
                    tables = tables.len(),
                    "Dashboard data loaded"
                );
                services.reservations.replace_all(reservations).await;
                self.tables = tables;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading dashboard data");
                services.notifications.error("Error loading data").await;
                Err(DashboardError::Load(e))
            }
        }
    }

    /// Change a reservation's status; the only field admins edit
    pub async fn update_status(
        &self,
        services: &Services,
        id: ReservationId,
        status: ReservationStatus,
    ) -> DashboardResult<Reservation> {
        match services
            .repository
            .update_reservation(id, ReservationUpdate::status(status))
            .await
        {
            Ok(updated) => {
                services.reservations.reconcile(updated.clone()).await;
                services
                    .notifications
                    .success("Reservation updated successfully")
                    .await;
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(reservation_id = id, error = %e, "Error updating reservation");
                services.notifications.error("Failed to update reservation").await;
                Err(DashboardError::Update { id, source: e })
            }
        }
    }

    pub async fn delete_reservation(&self, services: &Services, id: ReservationId) -> DashboardResult<()> {
        match services.repository.delete_reservation(id).await {
            Ok(()) => {
                services.reservations.delete(id).await;
                services
                    .notifications
                    .success("Reservation deleted successfully")
                    .await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(reservation_id = id, error = %e, "Error deleting reservation");
                services.notifications.error("Failed to delete reservation").await;
                Err(DashboardError::Delete { id, source: e })
            }
        }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    fn table_name(&self, table_id: TableId) -> Option<String> {
        self.tables
            .iter()
            .find(|t| t.id == table_id)
            .map(|t| t.name.clone())
    }

    /// Every reservation in the shared store, with table names
    pub async fn reservations(&self, services: &Services) -> Vec<DashboardEntry> {
        services
            .reservations
            .list()
            .await
            .into_iter()
            .map(|reservation| DashboardEntry {
                table_name: self.table_name(reservation.table_id),
                reservation,
            })
            .collect()
    }

    /// Overview for `date`; totals span every reservation
    pub async fn summary(&self, services: &Services, date: NaiveDate) -> DashboardSummary {
        let all = self.reservations(services).await;

        let total_reservations = all.len();
        let confirmed_reservations = all
            .iter()
            .filter(|e| e.reservation.status == ReservationStatus::Confirmed)
            .count();
        let total_guests = all.iter().map(|e| e.reservation.party_size).sum();

        let mut on_date: Vec<DashboardEntry> = all
            .into_iter()
            .filter(|e| e.reservation.date == date)
            .collect();
        on_date.sort_by_key(|e| e.reservation.time_slot);

        DashboardSummary {
            date,
            reservations: on_date,
            total_reservations,
            confirmed_reservations,
            total_guests,
            available_tables: self.tables.iter().filter(|t| t.available).count(),
            total_tables: self.tables.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{NewReservation, TimeSlot};
    use crate::state::Severity;

    async fn mounted() -> (Services, Dashboard) {
        let services = Services::in_memory();
        let mut dashboard = Dashboard::new();
        dashboard.mount(&services).await.unwrap();
        (services, dashboard)
    }

    #[tokio::test]
    async fn test_mount_loads_once() {
        let (services, mut dashboard) = mounted().await;
        assert!(dashboard.is_loaded());
        assert_eq!(dashboard.tables().len(), 6);
        assert_eq!(services.reservations.len().await, 2);

        // A second mount must not clobber local state
        services.reservations.delete(1).await;
        dashboard.mount(&services).await.unwrap();
        assert_eq!(services.reservations.len().await, 1);

        dashboard.refresh(&services).await.unwrap();
        assert_eq!(services.reservations.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_status_reconciles_by_id() {
        let (services, dashboard) = mounted().await;

        let updated = dashboard
            .update_status(&services, 2, ReservationStatus::Cancelled)
            .await
            .unwrap();

        assert_eq!(updated.status, ReservationStatus::Cancelled);
        assert_eq!(updated.customer_name, "Jane Smith");
        assert_eq!(services.reservations.get(2).await, Some(updated));
        assert_eq!(
            services.reservations.get(1).await.unwrap().status,
            ReservationStatus::Confirmed
        );

        let raised = services.notifications.list().await;
        assert_eq!(raised[0].message, "Reservation updated successfully");
        assert_eq!(raised[0].severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let (services, dashboard) = mounted().await;
        let before = services.reservations.list().await;

        let err = dashboard
            .update_status(&services, 999, ReservationStatus::Pending)
            .await
            .unwrap_err();

        assert_eq!(err.repository_error(), &RepositoryError::NotFound(999));
        assert_eq!(services.reservations.list().await, before);
        assert_eq!(
            services.notifications.list().await[0].message,
            "Failed to update reservation"
        );
    }

    #[tokio::test]
    async fn test_delete_reservation() {
        let (services, dashboard) = mounted().await;

        dashboard.delete_reservation(&services, 1).await.unwrap();
        assert!(services.reservations.get(1).await.is_none());
        assert!(services.repository.get_reservation(1).await.is_err());

        let err = dashboard.delete_reservation(&services, 1).await.unwrap_err();
        assert!(matches!(err, DashboardError::Delete { id: 1, .. }));
        assert_eq!(services.reservations.len().await, 1);

        let messages: Vec<String> = services
            .notifications
            .list()
            .await
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(
            messages,
            vec!["Reservation deleted successfully", "Failed to delete reservation"]
        );
    }

    #[tokio::test]
    async fn test_summary() {
        let (services, mut dashboard) = mounted().await;
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let slots = TimeSlot::evening_service();
        services
            .repository
            .create_reservation(NewReservation {
                table_id: 1,
                customer_name: "Early Bird".to_string(),
                customer_email: "early@example.com".to_string(),
                customer_phone: "555-0100".to_string(),
                date,
                time_slot: slots[0],
                party_size: 2,
            })
            .await
            .unwrap();
        services
            .repository
            .update_reservation(2, ReservationUpdate::status(ReservationStatus::Pending))
            .await
            .unwrap();
        dashboard.refresh(&services).await.unwrap();

        let summary = dashboard.summary(&services, date).await;
        let names: Vec<&str> = summary
            .reservations
            .iter()
            .map(|e| e.reservation.customer_name.as_str())
            .collect();
        assert_eq!(names, vec!["Early Bird", "John Doe", "Jane Smith"]);
        assert_eq!(summary.reservations[1].table_name.as_deref(), Some("Table 3"));
        assert_eq!(summary.total_reservations, 3);
        assert_eq!(summary.confirmed_reservations, 2);
        assert_eq!(summary.total_guests, 8);
        assert_eq!(summary.available_tables, 5);
        assert_eq!(summary.total_tables, 6);

        let other_day = dashboard
            .summary(&services, NaiveDate::from_ymd_opt(2025, 1, 16).unwrap())
            .await;
        assert!(other_day.reservations.is_empty());
        assert_eq!(other_day.total_reservations, 3);
    }
}
