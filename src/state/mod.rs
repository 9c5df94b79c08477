//! Shared State Containers
//!
//! - **notifications**: self-expiring user-facing messages
//! - **reservations**: process-wide reservation records
//!
//! Both stores are cheap to clone (an `Arc` inside) and own their list
//! exclusively; everything else goes through their methods.

pub mod notifications;
pub mod reservations;

pub use notifications::{Notification, NotificationId, NotificationStore, Severity};
pub use reservations::ReservationStore;
