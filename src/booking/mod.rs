//! Booking
//!
//! - **workflow**: the three-step reservation wizard
//! - **sessions**: per-customer wizard registry with idle expiry

pub mod sessions;
pub mod workflow;

pub use sessions::{BookingId, BookingSessions};
pub use workflow::{
    filter_candidates, BookingError, BookingPolicy, BookingResult, BookingStep, BookingView,
    BookingWorkflow, ContactDetails, Draft,
};
