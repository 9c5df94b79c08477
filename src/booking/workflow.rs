//! Booking Workflow
//!
//! Three-step wizard a customer walks through to reserve a table:
//!
//! ```text
//! SelectingDateTime → SelectingTable → EnteringDetails → Completed
//!         ↑                  │ ↑               │
//!         └──── back ────────┘ └──── back ─────┘
//! ```
//!
//! The draft accumulates date, slot, party size, table and contact details.
//! Candidate tables are filtered locally; there is no re-check against the
//! repository at submission and no double-booking prevention.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;

use crate::repository::{NewReservation, RepositoryError, Reservation, Table, TableId, TimeSlot};
use crate::services::Services;

/// Where the customer is in the wizard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    SelectingDateTime,
    SelectingTable,
    EnteringDetails,
    Completed,
}

impl BookingStep {
    /// 1-based position shown in progress indicators
    pub fn number(&self) -> u8 {
        match self {
            BookingStep::SelectingDateTime => 1,
            BookingStep::SelectingTable => 2,
            BookingStep::EnteringDetails => 3,
            BookingStep::Completed => 4,
        }
    }
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStep::SelectingDateTime => write!(f, "selecting date and time"),
            BookingStep::SelectingTable => write!(f, "selecting a table"),
            BookingStep::EnteringDetails => write!(f, "entering details"),
            BookingStep::Completed => write!(f, "completed"),
        }
    }
}

/// Rules the wizard enforces on step one
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Bookable start times
    pub time_slots: Vec<TimeSlot>,
    /// Largest party the wizard accepts
    pub max_party_size: u32,
    /// Party size a fresh draft starts with
    pub default_party_size: u32,
    /// Accept dates before today
    pub allow_past_dates: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            time_slots: TimeSlot::evening_service(),
            max_party_size: 8,
            default_party_size: 2,
            allow_past_dates: false,
        }
    }
}

/// Customer contact details collected on step three
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactDetails {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

impl ContactDetails {
    /// Presence check only; formats are not validated
    fn is_complete(&self) -> bool {
        [&self.customer_name, &self.customer_email, &self.customer_phone]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// The in-progress, not yet submitted reservation
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Draft {
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub party_size: u32,
    pub table_id: Option<TableId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactDetails>,
}

impl Draft {
    fn new(party_size: u32) -> Self {
        Self {
            date: None,
            time_slot: None,
            party_size,
            table_id: None,
            contact: None,
        }
    }
}

/// Errors raised by wizard operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Missing or malformed input; nothing was sent anywhere
    #[error("{0}")]
    Validation(String),

    /// The operation does not apply to the current step
    #[error("Cannot {action} while {step}")]
    InvalidTransition {
        step: BookingStep,
        action: &'static str,
    },

    /// The table is not in the candidate set for this party
    #[error("Table {0} is not available for this party")]
    TableUnavailable(TableId),

    /// The repository refused the reservation
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Serializable snapshot of a wizard for clients
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub step: BookingStep,
    pub step_number: u8,
    pub draft: Draft,
    pub time_slots: Vec<TimeSlot>,
    pub max_party_size: u32,
    /// Filled while selecting a table
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidate_tables: Vec<Table>,
    /// Selecting a table, but nothing fits: offer the way back to step one
    pub no_tables_available: bool,
    pub can_go_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_table: Option<Table>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Reservation>,
}

/// Tables that are available and seat at least `party_size`
pub fn filter_candidates(tables: &[Table], party_size: u32) -> Vec<Table> {
    tables
        .iter()
        .filter(|table| table.seats(party_size))
        .cloned()
        .collect()
}

/// One customer's pass through the booking wizard
#[derive(Debug)]
pub struct BookingWorkflow {
    step: BookingStep,
    draft: Draft,
    tables: Vec<Table>,
    confirmation: Option<Reservation>,
    policy: Arc<BookingPolicy>,
    touched_at: Instant,
}

impl BookingWorkflow {
    pub fn new(policy: Arc<BookingPolicy>) -> Self {
        Self {
            step: BookingStep::SelectingDateTime,
            draft: Draft::new(policy.default_party_size),
            tables: Vec::new(),
            confirmation: None,
            policy,
            touched_at: Instant::now(),
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn confirmation(&self) -> Option<&Reservation> {
        self.confirmation.as_ref()
    }

    /// Record activity for idle-session sweeping
    pub fn touch(&mut self) {
        self.touched_at = Instant::now();
    }

    pub fn touched_at(&self) -> Instant {
        self.touched_at
    }

    /// Fetch the table list the wizard filters from
    pub async fn load_tables(&mut self, services: &Services) {
        match services.repository.list_tables().await {
            Ok(tables) => self.tables = tables,
            Err(e) => {
                tracing::error!(error = %e, "Error loading tables");
                services.notifications.error("Error loading tables").await;
            }
        }
    }

    /// Step one: capture date, time slot and party size
    pub async fn select_date_time(
        &mut self,
        services: &Services,
        date: &str,
        time_slot: &str,
        party_size: u32,
    ) -> BookingResult<()> {
        self.expect_step(BookingStep::SelectingDateTime, "choose a date and time")?;

        if date.trim().is_empty() || time_slot.trim().is_empty() {
            return Err(reject(services, "Please select both date and time").await);
        }

        let slot = match time_slot.parse::<TimeSlot>() {
            Ok(slot) if self.policy.time_slots.contains(&slot) => slot,
            _ => {
                return Err(reject(services, "Please choose one of the available time slots").await)
            }
        };

        let date = match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                return Err(reject(services, format!("Invalid date: {}. Use YYYY-MM-DD", date)).await)
            }
        };

        if !self.policy.allow_past_dates && date < Utc::now().date_naive() {
            return Err(reject(services, "Reservations cannot be made for past dates").await);
        }

        if party_size == 0 || party_size > self.policy.max_party_size {
            return Err(reject(
                services,
                format!("Party size must be between 1 and {}", self.policy.max_party_size),
            )
            .await);
        }

        self.draft.date = Some(date);
        self.draft.time_slot = Some(slot);
        self.draft.party_size = party_size;
        self.step = BookingStep::SelectingTable;
        self.touch();

        tracing::debug!(%date, time_slot = %slot, party_size, "Date and time selected");
        Ok(())
    }

    /// Tables offered on step two
    pub fn candidate_tables(&self) -> Vec<Table> {
        filter_candidates(&self.tables, self.draft.party_size)
    }

    /// Step two: pick one of the candidate tables
    pub async fn select_table(&mut self, services: &Services, table_id: TableId) -> BookingResult<()> {
        self.expect_step(BookingStep::SelectingTable, "select a table")?;

        if !self.candidate_tables().iter().any(|t| t.id == table_id) {
            services
                .notifications
                .error("That table is not available for your party")
                .await;
            return Err(BookingError::TableUnavailable(table_id));
        }

        self.draft.table_id = Some(table_id);
        self.step = BookingStep::EnteringDetails;
        self.touch();
        Ok(())
    }

    /// Step three: submit contact details and create the reservation
    pub async fn submit_details(
        &mut self,
        services: &Services,
        contact: ContactDetails,
    ) -> BookingResult<Reservation> {
        self.expect_step(BookingStep::EnteringDetails, "submit details")?;

        if !contact.is_complete() {
            return Err(reject(services, "Please provide your name, email and phone").await);
        }

        let (date, time_slot, table_id) = match (self.draft.date, self.draft.time_slot, self.draft.table_id) {
            (Some(date), Some(slot), Some(table)) => (date, slot, table),
            _ => {
                return Err(BookingError::InvalidTransition {
                    step: self.step,
                    action: "submit an incomplete draft",
                })
            }
        };

        let request = NewReservation {
            table_id,
            customer_name: contact.customer_name.trim().to_string(),
            customer_email: contact.customer_email.trim().to_string(),
            customer_phone: contact.customer_phone.trim().to_string(),
            date,
            time_slot,
            party_size: self.draft.party_size,
        };

        self.draft.contact = Some(contact);
        self.touch();

        match services.repository.create_reservation(request).await {
            Ok(created) => {
                services.reservations.add(created.clone()).await;
                services
                    .notifications
                    .success("Reservation confirmed successfully!")
                    .await;

                self.confirmation = Some(created.clone());
                self.step = BookingStep::Completed;
                Ok(created)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error creating reservation");
                services.notifications.error("Failed to create reservation").await;
                Err(e.into())
            }
        }
    }

    /// Step back one step, dropping what the step being left collected
    pub fn back(&mut self) -> BookingResult<BookingStep> {
        match self.step {
            BookingStep::SelectingTable => {
                self.draft.table_id = None;
                self.step = BookingStep::SelectingDateTime;
            }
            BookingStep::EnteringDetails => {
                self.draft.contact = None;
                self.step = BookingStep::SelectingTable;
            }
            step => {
                return Err(BookingError::InvalidTransition {
                    step,
                    action: "go back",
                })
            }
        }
        self.touch();
        Ok(self.step)
    }

    /// Clear the draft and start over at step one
    pub fn reset(&mut self) {
        self.step = BookingStep::SelectingDateTime;
        self.draft = Draft::new(self.policy.default_party_size);
        self.confirmation = None;
        self.touch();
    }

    pub fn view(&self) -> BookingView {
        let candidate_tables = if self.step == BookingStep::SelectingTable {
            self.candidate_tables()
        } else {
            Vec::new()
        };
        let selected_table = self
            .draft
            .table_id
            .and_then(|id| self.tables.iter().find(|t| t.id == id).cloned());

        BookingView {
            step: self.step,
            step_number: self.step.number(),
            draft: self.draft.clone(),
            time_slots: self.policy.time_slots.clone(),
            max_party_size: self.policy.max_party_size,
            no_tables_available: self.step == BookingStep::SelectingTable && candidate_tables.is_empty(),
            candidate_tables,
            can_go_back: matches!(
                self.step,
                BookingStep::SelectingTable | BookingStep::EnteringDetails
            ),
            selected_table,
            confirmation: self.confirmation.clone(),
        }
    }

    fn expect_step(&self, expected: BookingStep, action: &'static str) -> BookingResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(BookingError::InvalidTransition {
                step: self.step,
                action,
            })
        }
    }
}

/// Surface a validation failure to the user and hand back the error
async fn reject(services: &Services, message: impl Into<String>) -> BookingError {
    let message = message.into();
    services.notifications.error(message.clone()).await;
    BookingError::Validation(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        InMemoryRepository, ReservationId, ReservationRepository, ReservationStatus,
        ReservationUpdate,
    };
    use crate::state::{NotificationStore, ReservationStore, Severity};
    use async_trait::async_trait;
    use chrono::Duration;

    fn future_date() -> String {
        (Utc::now().date_naive() + Duration::days(30))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            customer_name: "A".to_string(),
            customer_email: "a@b.com".to_string(),
            customer_phone: "555".to_string(),
        }
    }

    async fn workflow(services: &Services) -> BookingWorkflow {
        let mut workflow = BookingWorkflow::new(Arc::new(BookingPolicy::default()));
        workflow.load_tables(services).await;
        workflow
    }

    #[test]
    fn test_candidate_filter_property() {
        let tables = vec![
            Table::new(1, "Table 1", 2, "Window"),
            Table::new(2, "Table 2", 6, "Main Floor").unavailable(),
            Table::new(3, "Table 3", 4, "Patio"),
            Table::new(4, "Table 4", 8, "Private Room"),
            Table::new(5, "Table 5", 4, "Bar Area").unavailable(),
        ];

        for party_size in 0..=10 {
            let candidates = filter_candidates(&tables, party_size);
            let expected: Vec<TableId> = tables
                .iter()
                .filter(|t| t.available && t.capacity >= party_size)
                .map(|t| t.id)
                .collect();
            let actual: Vec<TableId> = candidates.iter().map(|t| t.id).collect();
            assert_eq!(actual, expected, "party size {}", party_size);
        }
    }

    #[test]
    fn test_no_candidates_when_nothing_fits() {
        let tables = vec![
            Table::new(1, "Table 1", 2, "Window"),
            Table::new(2, "Table 2", 6, "Main Floor").unavailable(),
        ];
        assert!(filter_candidates(&tables, 4).is_empty());
    }

    #[tokio::test]
    async fn test_empty_date_or_time_does_not_advance() {
        let services = Services::in_memory();
        let mut wf = workflow(&services).await;

        let err = wf.select_date_time(&services, "", "19:00", 2).await.unwrap_err();
        assert_eq!(err, BookingError::Validation("Please select both date and time".to_string()));
        assert_eq!(wf.step(), BookingStep::SelectingDateTime);

        let err = wf.select_date_time(&services, &future_date(), "", 2).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert_eq!(wf.step(), BookingStep::SelectingDateTime);
        assert!(wf.draft().date.is_none());

        let raised = services.notifications.list().await;
        assert_eq!(raised.len(), 2);
        assert!(raised.iter().all(|n| n.severity == Severity::Error));
    }

    #[tokio::test]
    async fn test_slot_must_come_from_the_enumeration() {
        let services = Services::in_memory();
        let mut wf = workflow(&services).await;

        assert!(wf.select_date_time(&services, &future_date(), "18:15", 2).await.is_err());
        assert!(wf.select_date_time(&services, &future_date(), "23:00", 2).await.is_err());
        assert_eq!(wf.step(), BookingStep::SelectingDateTime);
    }

    #[tokio::test]
    async fn test_past_date_and_party_size_limits() {
        let services = Services::in_memory();
        let mut wf = workflow(&services).await;

        assert!(wf.select_date_time(&services, "2000-01-01", "19:00", 2).await.is_err());
        assert!(wf.select_date_time(&services, "not-a-date", "19:00", 2).await.is_err());
        assert!(wf.select_date_time(&services, &future_date(), "19:00", 0).await.is_err());
        assert!(wf.select_date_time(&services, &future_date(), "19:00", 9).await.is_err());
        assert_eq!(wf.step(), BookingStep::SelectingDateTime);

        let lenient = BookingPolicy {
            allow_past_dates: true,
            ..Default::default()
        };
        let mut wf = BookingWorkflow::new(Arc::new(lenient));
        wf.select_date_time(&services, "2025-02-01", "19:00", 2).await.unwrap();
        assert_eq!(wf.step(), BookingStep::SelectingTable);
    }

    #[tokio::test]
    async fn test_full_booking() {
        let services = Services::in_memory();
        let mut wf = workflow(&services).await;
        let existing: Vec<ReservationId> = services
            .repository
            .list_reservations()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();

        wf.select_date_time(&services, &future_date(), "19:00", 2).await.unwrap();
        assert_eq!(wf.step(), BookingStep::SelectingTable);
        let candidate_ids: Vec<TableId> = wf.candidate_tables().iter().map(|t| t.id).collect();
        assert_eq!(candidate_ids, vec![1, 2, 4, 5, 6]);

        wf.select_table(&services, 1).await.unwrap();
        assert_eq!(wf.step(), BookingStep::EnteringDetails);
        assert_eq!(wf.view().selected_table.unwrap().name, "Table 1");

        let call_time = Utc::now();
        let created = wf.submit_details(&services, contact()).await.unwrap();

        assert_eq!(wf.step(), BookingStep::Completed);
        assert_eq!(created.status, ReservationStatus::Confirmed);
        assert!(created.created_at >= call_time);
        assert!(!existing.contains(&created.id));
        assert_eq!(created.table_id, 1);
        assert_eq!(created.party_size, 2);

        assert_eq!(services.reservations.get(created.id).await, Some(created.clone()));
        let raised = services.notifications.list().await;
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].severity, Severity::Success);
        assert_eq!(raised[0].message, "Reservation confirmed successfully!");
        assert_eq!(wf.view().confirmation, Some(created));
    }

    #[tokio::test]
    async fn test_table_must_be_a_candidate() {
        let services = Services::in_memory();
        let mut wf = workflow(&services).await;
        wf.select_date_time(&services, &future_date(), "19:00", 4).await.unwrap();

        // Table 3 is unavailable, table 1 is too small
        assert_eq!(wf.select_table(&services, 3).await, Err(BookingError::TableUnavailable(3)));
        assert_eq!(wf.select_table(&services, 1).await, Err(BookingError::TableUnavailable(1)));
        assert_eq!(wf.step(), BookingStep::SelectingTable);
    }

    #[tokio::test]
    async fn test_empty_candidate_set_offers_way_back() {
        let repository = Arc::new(InMemoryRepository::new(
            vec![
                Table::new(1, "Table 1", 2, "Window"),
                Table::new(2, "Table 2", 6, "Main Floor").unavailable(),
            ],
            Vec::new(),
        ));
        let services = Services::new(repository, ReservationStore::new(), NotificationStore::default());
        let mut wf = workflow(&services).await;

        wf.select_date_time(&services, &future_date(), "20:00", 4).await.unwrap();
        let view = wf.view();
        assert!(view.candidate_tables.is_empty());
        assert!(view.no_tables_available);
        assert!(view.can_go_back);

        assert_eq!(wf.back().unwrap(), BookingStep::SelectingDateTime);
    }

    #[tokio::test]
    async fn test_missing_contact_fields_rejected() {
        let services = Services::in_memory();
        let mut wf = workflow(&services).await;
        wf.select_date_time(&services, &future_date(), "19:00", 2).await.unwrap();
        wf.select_table(&services, 4).await.unwrap();

        let incomplete = ContactDetails {
            customer_phone: "   ".to_string(),
            ..contact()
        };
        let err = wf.submit_details(&services, incomplete).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert_eq!(wf.step(), BookingStep::EnteringDetails);
        assert!(services.reservations.is_empty().await);
    }

    #[tokio::test]
    async fn test_back_discards_only_leaving_step_fields() {
        let services = Services::in_memory();
        let mut wf = workflow(&services).await;
        let date = future_date();
        wf.select_date_time(&services, &date, "19:00", 2).await.unwrap();
        wf.select_table(&services, 2).await.unwrap();

        assert_eq!(wf.back().unwrap(), BookingStep::SelectingTable);
        assert_eq!(wf.draft().table_id, Some(2));

        assert_eq!(wf.back().unwrap(), BookingStep::SelectingDateTime);
        assert_eq!(wf.draft().table_id, None);
        assert_eq!(wf.draft().date.unwrap().format("%Y-%m-%d").to_string(), date);
        assert_eq!(wf.draft().time_slot.unwrap().to_string(), "19:00");

        assert!(matches!(
            wf.back(),
            Err(BookingError::InvalidTransition { step: BookingStep::SelectingDateTime, .. })
        ));
    }

    #[tokio::test]
    async fn test_reset_after_completion() {
        let services = Services::in_memory();
        let mut wf = workflow(&services).await;
        wf.select_date_time(&services, &future_date(), "21:30", 6).await.unwrap();
        wf.select_table(&services, 5).await.unwrap();
        wf.submit_details(&services, contact()).await.unwrap();

        assert!(wf.back().is_err());
        wf.reset();

        assert_eq!(wf.step(), BookingStep::SelectingDateTime);
        assert_eq!(wf.draft(), &Draft::new(2));
        assert!(wf.confirmation().is_none());
        assert_eq!(wf.tables().len(), 6);
    }

    #[tokio::test]
    async fn test_out_of_order_operations_rejected() {
        let services = Services::in_memory();
        let mut wf = workflow(&services).await;

        assert!(matches!(
            wf.select_table(&services, 1).await,
            Err(BookingError::InvalidTransition { .. })
        ));
        assert!(matches!(
            wf.submit_details(&services, contact()).await,
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    struct FailingRepository;

    #[async_trait]
    impl ReservationRepository for FailingRepository {
        async fn list_tables(&self) -> crate::repository::RepositoryResult<Vec<Table>> {
            Ok(crate::repository::memory::demo_tables())
        }

        async fn list_reservations(&self) -> crate::repository::RepositoryResult<Vec<Reservation>> {
            Ok(Vec::new())
        }

        async fn get_reservation(&self, id: ReservationId) -> crate::repository::RepositoryResult<Reservation> {
            Err(RepositoryError::NotFound(id))
        }

        async fn create_reservation(
            &self,
            _reservation: NewReservation,
        ) -> crate::repository::RepositoryResult<Reservation> {
            Err(RepositoryError::Unavailable("offline".to_string()))
        }

        async fn update_reservation(
            &self,
            id: ReservationId,
            _update: ReservationUpdate,
        ) -> crate::repository::RepositoryResult<Reservation> {
            Err(RepositoryError::NotFound(id))
        }

        async fn delete_reservation(&self, id: ReservationId) -> crate::repository::RepositoryResult<()> {
            Err(RepositoryError::NotFound(id))
        }
    }

    #[tokio::test]
    async fn test_repository_failure_keeps_state() {
        let services = Services::new(
            Arc::new(FailingRepository),
            ReservationStore::new(),
            NotificationStore::default(),
        );
        let mut wf = workflow(&services).await;
        wf.select_date_time(&services, &future_date(), "19:00", 2).await.unwrap();
        wf.select_table(&services, 1).await.unwrap();

        let err = wf.submit_details(&services, contact()).await.unwrap_err();

        assert!(matches!(err, BookingError::Repository(RepositoryError::Unavailable(_))));
        assert_eq!(wf.step(), BookingStep::EnteringDetails);
        assert!(services.reservations.is_empty().await);
        let raised = services.notifications.list().await;
        assert_eq!(raised.last().unwrap().message, "Failed to create reservation");
    }
}
