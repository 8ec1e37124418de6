//! Capability traits for pluggable backends
//!
//! The conversation core consumes storage and notification through these
//! traits so backends can be swapped without touching the state machine:
//! ScyllaDB in production, in-memory stores when no database is configured
//! and in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::appointment::{Appointment, AppointmentStatus};
use crate::error::Result;
use crate::turn::Turn;

/// Durable, append-only store for conversation turns
#[async_trait]
pub trait TurnStore: Send + Sync {
    /// Record one turn
    async fn append(&self, turn: &Turn) -> Result<()>;

    /// Full transcript of one call, oldest first
    async fn for_call(&self, call_id: &str) -> Result<Vec<Turn>>;

    /// All recorded turns
    async fn all(&self) -> Result<Vec<Turn>>;
}

/// Durable store for booked appointments
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Persist a new appointment
    async fn insert(&self, appointment: &Appointment) -> Result<()>;

    /// Fetch one appointment by id
    async fn get(&self, id: Uuid) -> Result<Option<Appointment>>;

    /// All appointments
    async fn all(&self) -> Result<Vec<Appointment>>;

    /// Update the status of an existing appointment, returning the updated
    /// record, or `None` when the id is unknown
    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>>;
}

/// Outbound confirmation message capability
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send (or simulate sending) a booking confirmation to the customer
    async fn send_confirmation(&self, appointment: &Appointment) -> Result<()>;
}
