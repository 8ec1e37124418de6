//! Appointment persistence using ScyllaDB

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use homedesk_core::{Appointment, AppointmentStatus, AppointmentStore, Result};

use crate::client::ScyllaClient;
use crate::error::PersistenceError;

type AppointmentRow = (
    Uuid,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    i64,
    i64,
);

const SELECT_COLUMNS: &str = "id, call_id, customer_name, customer_phone, problem, \
     scheduled_date, scheduled_time, technician_id, technician_name, status, \
     created_at, updated_at";

/// ScyllaDB implementation of the appointment store
#[derive(Clone)]
pub struct ScyllaAppointmentStore {
    client: ScyllaClient,
}

impl ScyllaAppointmentStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }

    fn row_to_appointment(row: AppointmentRow) -> Appointment {
        let (
            id,
            call_id,
            customer_name,
            customer_phone,
            problem,
            scheduled_date,
            scheduled_time,
            technician_id,
            technician_name,
            status,
            created_at,
            updated_at,
        ) = row;

        Appointment {
            id,
            call_id,
            customer_name,
            customer_phone,
            problem,
            scheduled_date,
            scheduled_time,
            technician_id,
            technician_name,
            status: AppointmentStatus::parse(&status).unwrap_or(AppointmentStatus::Scheduled),
            created_at: DateTime::from_timestamp_millis(created_at).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp_millis(updated_at).unwrap_or_else(Utc::now),
        }
    }
}

#[async_trait]
impl AppointmentStore for ScyllaAppointmentStore {
    async fn insert(&self, appointment: &Appointment) -> Result<()> {
        let query = format!(
            "INSERT INTO {}.appointments (
                id, call_id, customer_name, customer_phone, problem,
                scheduled_date, scheduled_time, technician_id, technician_name,
                status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    appointment.id,
                    &appointment.call_id,
                    &appointment.customer_name,
                    &appointment.customer_phone,
                    &appointment.problem,
                    &appointment.scheduled_date,
                    &appointment.scheduled_time,
                    &appointment.technician_id,
                    &appointment.technician_name,
                    appointment.status.as_str(),
                    appointment.created_at.timestamp_millis(),
                    appointment.updated_at.timestamp_millis(),
                ),
            )
            .await
            .map_err(PersistenceError::from)?;

        tracing::debug!(appointment_id = %appointment.id, "Appointment persisted");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>> {
        let query = format!(
            "SELECT {} FROM {}.appointments WHERE id = ?",
            SELECT_COLUMNS,
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (id,))
            .await
            .map_err(PersistenceError::from)?;

        if let Some(rows) = result.rows {
            if let Some(row) = rows.into_iter().next() {
                let typed = row
                    .into_typed::<AppointmentRow>()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
                return Ok(Some(Self::row_to_appointment(typed)));
            }
        }

        Ok(None)
    }

    async fn all(&self) -> Result<Vec<Appointment>> {
        let query = format!(
            "SELECT {} FROM {}.appointments",
            SELECT_COLUMNS,
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, ())
            .await
            .map_err(PersistenceError::from)?;

        let mut appointments = Vec::new();
        if let Some(rows) = result.rows {
            for row in rows {
                let typed = row
                    .into_typed::<AppointmentRow>()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
                appointments.push(Self::row_to_appointment(typed));
            }
        }

        Ok(appointments)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        if self.get(id).await?.is_none() {
            return Ok(None);
        }

        let query = format!(
            "UPDATE {}.appointments SET status = ?, updated_at = ? WHERE id = ?",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(query, (status.as_str(), Utc::now().timestamp_millis(), id))
            .await
            .map_err(PersistenceError::from)?;

        tracing::debug!(appointment_id = %id, status = %status.as_str(), "Appointment status updated");
        self.get(id).await
    }
}
