//! Dashboard API and router assembly

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use homedesk_core::AppointmentStatus;

use crate::state::AppState;
use crate::voice;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Telephony webhooks
        .route("/voice/incoming", post(voice::incoming_call))
        .route("/voice/speech", post(voice::speech))
        .route("/voice/complete", post(voice::complete))
        // Dashboard API
        .route("/api/appointments", get(list_appointments))
        .route("/api/appointments/:id", get(get_appointment))
        .route("/api/appointments/:id/status", patch(update_appointment_status))
        .route("/api/conversations", get(list_conversations))
        .route("/api/conversations/:call_sid", get(get_conversation))
        .route("/api/technicians", get(list_technicians))
        .route("/api/analytics", get(analytics))
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Middleware
        .layer(TraceLayer::new_for_http());

    let router = if state.config.server.cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Deserialize)]
struct AppointmentQuery {
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    status: Option<String>,
    date: Option<String>,
}

/// List appointments, newest first, with optional status/date filters
async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let mut appointments = state.agent.appointments().await?;

    if let Some(status) = &query.status {
        let status = AppointmentStatus::parse(status)
            .ok_or_else(|| ServerError::InvalidRequest(format!("unknown status: {}", status)))?;
        appointments.retain(|a| a.status == status);
    }

    if let Some(date) = &query.date {
        appointments.retain(|a| &a.scheduled_date == date);
    }

    appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = appointments.len();
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 200);
    let items: Vec<_> = appointments
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Ok(Json(json!({
        "appointments": items,
        "total": total,
    })))
}

/// Get one appointment by id
async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let appointment = state
        .agent
        .appointment(id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("appointment {}", id)))?;

    Ok(Json(json!(appointment)))
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: String,
}

/// Update appointment status (dashboard path, outside the call flow)
async fn update_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let status = AppointmentStatus::parse(&update.status).ok_or_else(|| {
        ServerError::InvalidRequest(format!("unknown status: {}", update.status))
    })?;

    let appointment = state
        .agent
        .update_appointment_status(id, status)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("appointment {}", id)))?;

    Ok(Json(json!(appointment)))
}

#[derive(Debug, Deserialize)]
struct ConversationQuery {
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    call_sid: Option<String>,
}

/// List conversation turns, newest first
async fn list_conversations(
    State(state): State<AppState>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let mut turns = state.agent.turns().await?;

    if let Some(call_sid) = &query.call_sid {
        turns.retain(|t| &t.call_id == call_sid);
    }

    turns.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total = turns.len();
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 200);
    let items: Vec<_> = turns
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Ok(Json(json!({
        "conversations": items,
        "total": total,
    })))
}

/// Chronological transcript of one call
async fn get_conversation(
    State(state): State<AppState>,
    Path(call_sid): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let turns = state.agent.transcript(&call_sid).await?;

    if turns.is_empty() {
        return Err(ServerError::NotFound(format!("conversation {}", call_sid)));
    }

    Ok(Json(json!(turns)))
}

/// Static technician roster
async fn list_technicians(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "technicians": state.agent.technicians() }))
}

/// Appointment breakdowns for the dashboard
async fn analytics(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let appointments = state.agent.appointments().await?;

    let mut by_status: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut by_date: BTreeMap<String, usize> = BTreeMap::new();

    for appointment in &appointments {
        *by_status.entry(appointment.status.as_str()).or_insert(0) += 1;
        *by_date.entry(appointment.scheduled_date.clone()).or_insert(0) += 1;
    }

    Ok(Json(json!({
        "total_appointments": appointments.len(),
        "status_breakdown": by_status,
        "date_breakdown": by_date,
    })))
}

/// Health check
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ready",
        "active_calls": state.agent.active_calls(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use homedesk_config::Settings;

    #[tokio::test]
    async fn test_router_creation() {
        let state = AppState::in_memory(Settings::default());
        let _ = create_router(state);
    }
}
