//! Conversation turn persistence using ScyllaDB

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use homedesk_core::{Result, Turn, TurnRole, TurnStore};

use crate::client::ScyllaClient;
use crate::error::PersistenceError;

/// ScyllaDB implementation of the turn store
#[derive(Clone)]
pub struct ScyllaTurnStore {
    client: ScyllaClient,
}

impl ScyllaTurnStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }

    fn row_to_turn(
        row: (String, i64, Uuid, String, String),
    ) -> Turn {
        let (call_id, recorded_at, _turn_id, role, content) = row;
        Turn {
            call_id,
            role: TurnRole::parse(&role),
            content,
            timestamp: DateTime::from_timestamp_millis(recorded_at).unwrap_or_else(Utc::now),
        }
    }
}

#[async_trait]
impl TurnStore for ScyllaTurnStore {
    async fn append(&self, turn: &Turn) -> Result<()> {
        let query = format!(
            "INSERT INTO {}.conversation_turns (call_id, recorded_at, turn_id, role, content)
             VALUES (?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    &turn.call_id,
                    turn.timestamp.timestamp_millis(),
                    Uuid::new_v4(),
                    turn.role.as_str(),
                    &turn.content,
                ),
            )
            .await
            .map_err(PersistenceError::from)?;

        tracing::debug!(call_id = %turn.call_id, role = %turn.role.as_str(), "Turn recorded");
        Ok(())
    }

    async fn for_call(&self, call_id: &str) -> Result<Vec<Turn>> {
        let query = format!(
            "SELECT call_id, recorded_at, turn_id, role, content
             FROM {}.conversation_turns WHERE call_id = ?",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (call_id,))
            .await
            .map_err(PersistenceError::from)?;

        let mut turns = Vec::new();
        if let Some(rows) = result.rows {
            for row in rows {
                let typed = row
                    .into_typed::<(String, i64, Uuid, String, String)>()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
                turns.push(Self::row_to_turn(typed));
            }
        }

        Ok(turns)
    }

    async fn all(&self) -> Result<Vec<Turn>> {
        // Full scan; the dashboard paginates after the fact and call volume
        // is bounded by the conversation store capacity
        let query = format!(
            "SELECT call_id, recorded_at, turn_id, role, content
             FROM {}.conversation_turns",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, ())
            .await
            .map_err(PersistenceError::from)?;

        let mut turns = Vec::new();
        if let Some(rows) = result.rows {
            for row in rows {
                let typed = row
                    .into_typed::<(String, i64, Uuid, String, String)>()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
                turns.push(Self::row_to_turn(typed));
            }
        }

        Ok(turns)
    }
}
