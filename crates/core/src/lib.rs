//! Core types and traits for the homedesk scheduling assistant
//!
//! This crate provides the foundational pieces shared by all other crates:
//! - Conversation turn types
//! - Appointment and technician types
//! - Error types
//! - Capability traits for storage and notification backends

pub mod appointment;
pub mod error;
pub mod traits;
pub mod turn;

pub use appointment::{Appointment, AppointmentStatus, Technician};
pub use error::{Error, Result};
pub use traits::{AppointmentStore, Notifier, TurnStore};
pub use turn::{Turn, TurnRole};
