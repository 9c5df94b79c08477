//! API Routes
//!
//! Route handlers organized by functionality.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod menu;
pub mod notifications;
pub mod tables;
