//! Storage and notification backends for the scheduling assistant
//!
//! Provides two implementations of the core capability traits:
//! - ScyllaDB-backed stores for conversation turns, appointments, and the
//!   SMS audit trail
//! - In-memory stores used when no database is configured and in tests
//!
//! All writes issued by the conversation core are best-effort: the caller
//! logs failures and continues.

pub mod appointments;
pub mod client;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sms;
pub mod turns;

pub use appointments::ScyllaAppointmentStore;
pub use client::{ScyllaClient, ScyllaConfig};
pub use error::PersistenceError;
pub use memory::{MemoryAppointmentStore, MemoryNotifier, MemoryTurnStore};
pub use sms::{format_confirmation, ScyllaSmsNotifier};
pub use turns::ScyllaTurnStore;

use std::sync::Arc;

use homedesk_core::{AppointmentStore, Notifier, TurnStore};

/// Combined persistence layer handed to the server
pub struct PersistenceLayer {
    pub turns: Arc<dyn TurnStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Connect to ScyllaDB, ensure the schema, and build the stores
pub async fn init(config: ScyllaConfig, company_name: &str) -> Result<PersistenceLayer, PersistenceError> {
    let client = ScyllaClient::connect(config).await?;
    client.ensure_schema().await?;

    Ok(PersistenceLayer {
        turns: Arc::new(ScyllaTurnStore::new(client.clone())),
        appointments: Arc::new(ScyllaAppointmentStore::new(client.clone())),
        notifier: Arc::new(ScyllaSmsNotifier::new(client, company_name)),
    })
}

/// Build a purely in-memory persistence layer
pub fn in_memory(company_name: &str) -> PersistenceLayer {
    PersistenceLayer {
        turns: Arc::new(MemoryTurnStore::new()),
        appointments: Arc::new(MemoryAppointmentStore::new()),
        notifier: Arc::new(MemoryNotifier::new(company_name)),
    }
}
