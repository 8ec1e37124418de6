//! In-memory backends
//!
//! Used when no database is configured and by every test. Each store is an
//! explicit object shared by `Arc`, never a process-wide singleton.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use homedesk_core::{
    Appointment, AppointmentStatus, AppointmentStore, Notifier, Result, Turn, TurnStore,
};

use crate::sms::format_confirmation;

/// In-memory append-only turn log
#[derive(Default)]
pub struct MemoryTurnStore {
    turns: RwLock<Vec<Turn>>,
}

impl MemoryTurnStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TurnStore for MemoryTurnStore {
    async fn append(&self, turn: &Turn) -> Result<()> {
        self.turns.write().push(turn.clone());
        Ok(())
    }

    async fn for_call(&self, call_id: &str) -> Result<Vec<Turn>> {
        let mut turns: Vec<Turn> = self
            .turns
            .read()
            .iter()
            .filter(|t| t.call_id == call_id)
            .cloned()
            .collect();
        turns.sort_by_key(|t| t.timestamp);
        Ok(turns)
    }

    async fn all(&self) -> Result<Vec<Turn>> {
        Ok(self.turns.read().clone())
    }
}

/// In-memory appointment store
#[derive(Default)]
pub struct MemoryAppointmentStore {
    appointments: RwLock<Vec<Appointment>>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn insert(&self, appointment: &Appointment) -> Result<()> {
        self.appointments.write().push(appointment.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self
            .appointments
            .read()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<Appointment>> {
        Ok(self.appointments.read().clone())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let mut appointments = self.appointments.write();
        match appointments.iter_mut().find(|a| a.id == id) {
            Some(appointment) => {
                appointment.status = status;
                appointment.updated_at = Utc::now();
                Ok(Some(appointment.clone()))
            }
            None => Ok(None),
        }
    }
}

/// A sent (simulated) message captured by [`MemoryNotifier`]
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub phone: String,
    pub body: String,
}

/// In-memory notifier that records formatted confirmations
pub struct MemoryNotifier {
    company: String,
    sent: RwLock<Vec<SentMessage>>,
}

impl MemoryNotifier {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            sent: RwLock::new(Vec::new()),
        }
    }

    /// Messages recorded so far
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send_confirmation(&self, appointment: &Appointment) -> Result<()> {
        let body = format_confirmation(appointment, &self.company);
        tracing::info!(
            phone = %appointment.customer_phone,
            appointment_id = %appointment.id,
            "Confirmation SMS recorded in memory"
        );
        self.sent.write().push(SentMessage {
            phone: appointment.customer_phone.clone(),
            body,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_appointment() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            call_id: "CA200".to_string(),
            customer_name: "Jane Roe".to_string(),
            customer_phone: "unknown".to_string(),
            problem: "leaky pipe".to_string(),
            scheduled_date: "2026-08-09".to_string(),
            scheduled_time: "10:00 AM".to_string(),
            technician_id: "tech-002".to_string(),
            technician_name: "Jane Smith".to_string(),
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_turn_store_filters_by_call() {
        let store = MemoryTurnStore::new();
        store.append(&Turn::caller("CA1", "hello")).await.unwrap();
        store.append(&Turn::assistant("CA1", "hi")).await.unwrap();
        store.append(&Turn::caller("CA2", "other")).await.unwrap();

        let turns = store.for_call("CA1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert!(turns.iter().all(|t| t.call_id == "CA1"));

        assert_eq!(store.all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_appointment_store_update_status() {
        let store = MemoryAppointmentStore::new();
        let appointment = sample_appointment();
        store.insert(&appointment).await.unwrap();

        let updated = store
            .update_status(appointment.id, AppointmentStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Cancelled);

        let missing = store
            .update_status(Uuid::new_v4(), AppointmentStatus::Confirmed)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_notifier_records_messages() {
        let notifier = MemoryNotifier::new("HomeDesk");
        let appointment = sample_appointment();

        notifier.send_confirmation(&appointment).await.unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].phone, "unknown");
        assert!(sent[0].body.contains("Jane Roe"));
    }
}
