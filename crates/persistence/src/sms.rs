//! Simulated SMS confirmations with ScyllaDB audit trail
//!
//! Messages are NOT actually transmitted. The formatted body is persisted
//! and logged so the dashboard and tests can inspect what would have been
//! sent.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use homedesk_core::{Appointment, Notifier, Result};

use crate::client::ScyllaClient;
use crate::error::PersistenceError;

/// Build the booking confirmation body
pub fn format_confirmation(appointment: &Appointment, company: &str) -> String {
    format!(
        "Hi {name}! Your {company} appointment has been confirmed for {date} at {time}. \
         Technician: {technician}. Reference: {id}. Thank you for choosing {company}!",
        name = appointment.customer_name,
        company = company,
        date = appointment.scheduled_date,
        time = appointment.scheduled_time,
        technician = appointment.technician_name,
        id = appointment.id,
    )
}

/// Simulated SMS sender that persists an audit row per message
#[derive(Clone)]
pub struct ScyllaSmsNotifier {
    client: ScyllaClient,
    company: String,
}

impl ScyllaSmsNotifier {
    pub fn new(client: ScyllaClient, company: impl Into<String>) -> Self {
        Self {
            client,
            company: company.into(),
        }
    }
}

#[async_trait]
impl Notifier for ScyllaSmsNotifier {
    async fn send_confirmation(&self, appointment: &Appointment) -> Result<()> {
        let body = format_confirmation(appointment, &self.company);
        let message_id = Uuid::new_v4();

        let query = format!(
            "INSERT INTO {}.sms_messages (
                phone_number, message_id, call_id, body, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    &appointment.customer_phone,
                    message_id,
                    &appointment.call_id,
                    &body,
                    "simulated_sent",
                    Utc::now().timestamp_millis(),
                ),
            )
            .await
            .map_err(PersistenceError::from)?;

        tracing::info!(
            phone = %appointment.customer_phone,
            message_id = %message_id,
            appointment_id = %appointment.id,
            "Confirmation SMS simulated and persisted"
        );
        tracing::debug!(body = %body, "SMS content (simulated)");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homedesk_core::AppointmentStatus;

    fn sample_appointment() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            call_id: "CA100".to_string(),
            customer_name: "John Smith".to_string(),
            customer_phone: "+15551234567".to_string(),
            problem: "dishwasher is broken".to_string(),
            scheduled_date: "2026-08-09".to_string(),
            scheduled_time: "10:00 AM".to_string(),
            technician_id: "tech-001".to_string(),
            technician_name: "John Doe".to_string(),
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_confirmation() {
        let appointment = sample_appointment();
        let body = format_confirmation(&appointment, "HomeDesk");

        assert!(body.contains("John Smith"));
        assert!(body.contains("2026-08-09"));
        assert!(body.contains("10:00 AM"));
        assert!(body.contains("John Doe"));
        assert!(body.contains(&appointment.id.to_string()));
        assert!(body.contains("HomeDesk"));
    }
}
