//! Keyspace and table bootstrap
//!
//! Tables store timestamps as bigint epoch milliseconds so reads never
//! depend on driver-side timestamp conversions.

use scylla::Session;

use crate::error::PersistenceError;

/// Create the keyspace if it does not exist
pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = \
         {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, ())
        .await
        .map_err(|e| PersistenceError::SchemaError(e.to_string()))?;

    Ok(())
}

/// Create all tables if they do not exist
pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    let tables = [
        format!(
            "CREATE TABLE IF NOT EXISTS {}.conversation_turns (
                call_id text,
                recorded_at bigint,
                turn_id uuid,
                role text,
                content text,
                PRIMARY KEY (call_id, recorded_at, turn_id)
            ) WITH CLUSTERING ORDER BY (recorded_at ASC)",
            keyspace
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {}.appointments (
                id uuid PRIMARY KEY,
                call_id text,
                customer_name text,
                customer_phone text,
                problem text,
                scheduled_date text,
                scheduled_time text,
                technician_id text,
                technician_name text,
                status text,
                created_at bigint,
                updated_at bigint
            )",
            keyspace
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {}.sms_messages (
                phone_number text,
                message_id uuid,
                call_id text,
                body text,
                status text,
                created_at bigint,
                PRIMARY KEY (phone_number, message_id)
            )",
            keyspace
        ),
    ];

    for query in tables {
        session
            .query_unpaged(query, ())
            .await
            .map_err(|e| PersistenceError::SchemaError(e.to_string()))?;
    }

    Ok(())
}
