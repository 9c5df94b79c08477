//! Core data types for the reservation repository
//!
//! - `Table`: a physical seating unit
//! - `Reservation`: a booking binding a customer, a table, a date/slot and a party size
//! - `TimeSlot`: one bookable start time
//! - `NewReservation` / `ReservationUpdate`: create and partial-update payloads

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub type TableId = u32;
pub type ReservationId = i64;

/// A physical table in the dining room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    /// Seats at the table, always positive
    pub capacity: u32,
    pub location: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Table {
    pub fn new(id: TableId, name: impl Into<String>, capacity: u32, location: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            location: location.into(),
            available: true,
        }
    }

    /// Builder method: mark the table as not bookable
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// True if the table is bookable and seats `party_size`
    pub fn seats(&self, party_size: u32) -> bool {
        self.available && self.capacity >= party_size
    }
}

/// A bookable start time, written as `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// The default evening service: 17:00 through 21:30 every half hour
    pub fn evening_service() -> Vec<TimeSlot> {
        (17..22)
            .flat_map(|hour| [0, 30].into_iter().filter_map(move |minute| TimeSlot::new(hour, minute)))
            .collect()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeSlot {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M").map(Self)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Lifecycle status of a reservation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Pending,
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Confirmed => write!(f, "confirmed"),
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "pending" => Ok(ReservationStatus::Pending),
            "cancelled" | "canceled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!(
                "Invalid status: {}. Use confirmed, pending, or cancelled",
                other
            )),
        }
    }
}

/// A stored reservation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub table_id: TableId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub party_size: u32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a reservation; the repository assigns the rest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewReservation {
    pub table_id: TableId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub party_size: u32,
}

impl NewReservation {
    /// Materialize the stored record
    pub fn into_reservation(self, id: ReservationId, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            table_id: self.table_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            date: self.date,
            time_slot: self.time_slot,
            party_size: self.party_size,
            status: ReservationStatus::Confirmed,
            created_at,
        }
    }
}

/// Partial update: only the fields that are `Some` are written
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReservationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<TableId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
}

impl ReservationUpdate {
    /// Update that only touches the status
    pub fn status(status: ReservationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the present fields onto `reservation`
    pub fn apply(&self, reservation: &mut Reservation) {
        if let Some(table_id) = self.table_id {
            reservation.table_id = table_id;
        }
        if let Some(name) = &self.customer_name {
            reservation.customer_name = name.clone();
        }
        if let Some(email) = &self.customer_email {
            reservation.customer_email = email.clone();
        }
        if let Some(phone) = &self.customer_phone {
            reservation.customer_phone = phone.clone();
        }
        if let Some(date) = self.date {
            reservation.date = date;
        }
        if let Some(slot) = self.time_slot {
            reservation.time_slot = slot;
        }
        if let Some(party_size) = self.party_size {
            reservation.party_size = party_size;
        }
        if let Some(status) = self.status {
            reservation.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reservation {
        NewReservation {
            table_id: 2,
            customer_name: "Jane Smith".to_string(),
            customer_email: "jane@example.com".to_string(),
            customer_phone: "555-5678".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            time_slot: "20:00".parse().unwrap(),
            party_size: 2,
        }
        .into_reservation(2, Utc::now())
    }

    #[test]
    fn test_evening_service_slots() {
        let slots = TimeSlot::evening_service();
        let labels: Vec<String> = slots.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            vec!["17:00", "17:30", "18:00", "18:30", "19:00", "19:30", "20:00", "20:30", "21:00", "21:30"]
        );
    }

    #[test]
    fn test_time_slot_parse() {
        assert_eq!("19:00".parse::<TimeSlot>().unwrap(), TimeSlot::new(19, 0).unwrap());
        assert!("".parse::<TimeSlot>().is_err());
        assert!("7pm".parse::<TimeSlot>().is_err());
        assert!("25:00".parse::<TimeSlot>().is_err());
    }

    #[test]
    fn test_time_slot_wire_format() {
        let json = serde_json::to_string(&TimeSlot::new(17, 30).unwrap()).unwrap();
        assert_eq!(json, "\"17:30\"");
        let slot: TimeSlot = serde_json::from_str("\"21:00\"").unwrap();
        assert_eq!(slot.to_string(), "21:00");
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Confirmed".parse::<ReservationStatus>().unwrap(), ReservationStatus::Confirmed);
        assert_eq!("canceled".parse::<ReservationStatus>().unwrap(), ReservationStatus::Cancelled);
        assert!("seated".parse::<ReservationStatus>().is_err());
        assert_eq!(ReservationStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_new_reservation_is_confirmed() {
        let reservation = sample();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.id, 2);
    }

    #[test]
    fn test_partial_update_only_touches_present_fields() {
        let mut reservation = sample();
        let original = reservation.clone();

        ReservationUpdate::status(ReservationStatus::Cancelled).apply(&mut reservation);

        assert_eq!(reservation.status, ReservationStatus::Cancelled);
        assert_eq!(reservation.customer_name, original.customer_name);
        assert_eq!(reservation.table_id, original.table_id);
        assert_eq!(reservation.time_slot, original.time_slot);
    }

    #[test]
    fn test_table_seats() {
        let table = Table::new(1, "Table 1", 2, "Window");
        assert!(table.seats(2));
        assert!(!table.seats(3));
        assert!(!table.unavailable().seats(1));
    }
}
