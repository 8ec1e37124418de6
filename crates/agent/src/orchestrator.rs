//! Call session orchestration
//!
//! One `SchedulingAgent` serves every call: it owns the call state store,
//! sequences extraction, reply generation, persistence and booking for each
//! utterance, and finalizes calls when the telephony layer reports
//! completion. Persistence and notification failures are logged and never
//! surface to the caller.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use homedesk_config::{AgentConfig, BusinessConfig};
use homedesk_core::{
    Appointment, AppointmentStatus, AppointmentStore, Notifier, Result, Technician, Turn,
    TurnStore,
};

use crate::flow::{self, Script};
use crate::generator::{ReplyContext, ReplyGenerator};
use crate::schedule::SlotPolicy;
use crate::state::{CallState, CallStateStore};
use crate::technician::{assign_technician, default_roster};
use crate::AgentError;

/// Reply for one conversation turn
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub text: String,
    /// End the call after speaking; `false` keeps listening
    pub hangup: bool,
}

/// Construction options for the agent
#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub company_name: String,
    pub slot: SlotPolicy,
    pub max_active_calls: usize,
    pub roster: Vec<Technician>,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            company_name: "HomeDesk".to_string(),
            slot: SlotPolicy::default(),
            max_active_calls: 100,
            roster: default_roster(),
        }
    }
}

impl AgentOptions {
    pub fn from_config(agent: &AgentConfig, business: &BusinessConfig) -> Self {
        Self {
            company_name: business.company_name.clone(),
            slot: SlotPolicy::from_config(business),
            max_active_calls: agent.max_active_calls,
            roster: default_roster(),
        }
    }
}

/// The per-call conversation orchestrator
pub struct SchedulingAgent {
    calls: CallStateStore,
    script: Script,
    policy: SlotPolicy,
    company: String,
    roster: Vec<Technician>,
    generator: Arc<dyn ReplyGenerator>,
    turns: Arc<dyn TurnStore>,
    appointments: Arc<dyn AppointmentStore>,
    notifier: Arc<dyn Notifier>,
    /// Calls whose appointment has already been committed; guards the
    /// immediate-confirmation path against the completion event racing it
    committed: Mutex<HashSet<String>>,
}

impl SchedulingAgent {
    pub fn new(
        options: AgentOptions,
        generator: Arc<dyn ReplyGenerator>,
        turns: Arc<dyn TurnStore>,
        appointments: Arc<dyn AppointmentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let roster = if options.roster.is_empty() {
            default_roster()
        } else {
            options.roster
        };

        Self {
            calls: CallStateStore::new(options.max_active_calls),
            script: Script::new(&options.company_name, &options.slot.spoken),
            policy: options.slot,
            company: options.company_name,
            roster,
            generator,
            turns,
            appointments,
            notifier,
            committed: Mutex::new(HashSet::new()),
        }
    }

    /// Opening prompt for a newly connected call
    pub fn greeting(&self) -> String {
        self.script.opening()
    }

    /// Run one state-machine turn for a recognized utterance
    ///
    /// Always returns a speakable reply. Internal failures produce the
    /// apology reply and leave the stored state unchanged so the next
    /// utterance retries from the same step.
    pub async fn handle_utterance(
        &self,
        call_id: &str,
        text: &str,
        caller_phone: Option<&str>,
    ) -> TurnReply {
        match self.process_turn(call_id, text, caller_phone).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    call_id = %call_id,
                    error = %e,
                    "Turn processing failed, state left unchanged"
                );
                TurnReply {
                    text: self.script.apology(),
                    hangup: false,
                }
            }
        }
    }

    async fn process_turn(
        &self,
        call_id: &str,
        text: &str,
        caller_phone: Option<&str>,
    ) -> std::result::Result<TurnReply, AgentError> {
        let mut state = self.calls.get_or_create(call_id)?;

        if state.caller_phone.is_none() {
            if let Some(phone) = caller_phone {
                state.caller_phone = Some(phone.to_string());
            }
        }

        self.record_turn(Turn::caller(call_id, text)).await;

        let outcome = flow::advance(&mut state, text, &self.script, &self.policy);
        let reply = self.render_reply(&state, text, &outcome.reply).await;

        self.record_turn(Turn::assistant(call_id, &reply)).await;

        if outcome.book {
            self.commit_appointment(&state, None).await;
        }

        tracing::info!(
            call_id = %call_id,
            step = %state.step.as_str(),
            caller_name = ?state.caller_name,
            confirmed = ?state.confirmed,
            "Conversation state updated"
        );

        if outcome.hangup {
            self.calls.remove(call_id);
        } else {
            self.calls.write_back(state);
        }

        Ok(TurnReply {
            text: reply,
            hangup: outcome.hangup,
        })
    }

    /// Finalize a call on the telephony completion event
    ///
    /// Books the appointment if the call was confirmed but never committed
    /// (the caller hung up between accepting and the reply), then drops the
    /// state entry. Safe to invoke for unknown or already-finished calls.
    pub async fn handle_call_completion(&self, call_id: &str, caller_phone: Option<&str>) {
        match self.calls.remove(call_id) {
            Some(state)
                if state.confirmed == Some(true)
                    && state.caller_name.is_some()
                    && state.problem.is_some() =>
            {
                if let Some(appointment) = self.commit_appointment(&state, caller_phone).await {
                    let note = format!("Appointment scheduled: {}", appointment.id);
                    self.record_turn(Turn::assistant(call_id, note)).await;
                    tracing::info!(
                        call_id = %call_id,
                        appointment_id = %appointment.id,
                        "Call completed and appointment scheduled"
                    );
                }
            }
            Some(_) => {
                tracing::info!(call_id = %call_id, "Call completed without appointment");
            }
            None => {
                tracing::debug!(call_id = %call_id, "Completion for unknown or finished call");
            }
        }

        // The call is over either way; the guard entry is no longer needed
        self.committed.lock().remove(call_id);
    }

    /// All booked appointments
    pub async fn appointments(&self) -> Result<Vec<Appointment>> {
        self.appointments.all().await
    }

    /// One appointment by id
    pub async fn appointment(&self, id: Uuid) -> Result<Option<Appointment>> {
        self.appointments.get(id).await
    }

    /// Dashboard status update path, outside the conversation flow
    pub async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        self.appointments.update_status(id, status).await
    }

    /// All recorded conversation turns
    pub async fn turns(&self) -> Result<Vec<Turn>> {
        self.turns.all().await
    }

    /// Transcript of one call, oldest first
    pub async fn transcript(&self, call_id: &str) -> Result<Vec<Turn>> {
        self.turns.for_call(call_id).await
    }

    /// The static technician roster
    pub fn technicians(&self) -> &[Technician] {
        &self.roster
    }

    /// Number of in-progress calls
    pub fn active_calls(&self) -> usize {
        self.calls.len()
    }

    async fn render_reply(&self, state: &CallState, utterance: &str, scripted: &str) -> String {
        let ctx = ReplyContext {
            company: &self.company,
            state,
            utterance,
            scripted,
        };

        match self.generator.render(&ctx).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => scripted.to_string(),
            Err(e) => {
                tracing::warn!(
                    call_id = %state.call_id,
                    generator = self.generator.name(),
                    error = %e,
                    "Reply generation failed, using scripted reply"
                );
                scripted.to_string()
            }
        }
    }

    async fn record_turn(&self, turn: Turn) {
        if let Err(e) = self.turns.append(&turn).await {
            tracing::warn!(
                call_id = %turn.call_id,
                role = %turn.role.as_str(),
                error = %e,
                "Failed to persist turn, continuing"
            );
        }
    }

    /// Commit the booking for a confirmed call, at most once per call id
    ///
    /// Returns the appointment when this invocation created it, `None` when
    /// the call was already committed or required fields are missing.
    async fn commit_appointment(
        &self,
        state: &CallState,
        phone_override: Option<&str>,
    ) -> Option<Appointment> {
        let (name, problem) = match (&state.caller_name, &state.problem) {
            (Some(name), Some(problem)) => (name.clone(), problem.clone()),
            _ => {
                tracing::warn!(
                    call_id = %state.call_id,
                    "Confirmed call missing name or problem, skipping booking"
                );
                return None;
            }
        };

        if !self.committed.lock().insert(state.call_id.clone()) {
            tracing::debug!(call_id = %state.call_id, "Appointment already committed for call");
            return None;
        }

        let phone = phone_override
            .map(str::to_string)
            .or_else(|| state.caller_phone.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let technician = match assign_technician(&self.roster, &problem) {
            Some(technician) => technician,
            None => {
                tracing::warn!(call_id = %state.call_id, "Empty technician roster, skipping booking");
                return None;
            }
        };

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            call_id: state.call_id.clone(),
            customer_name: name,
            customer_phone: phone,
            problem,
            scheduled_date: self.policy.resolve_date(),
            scheduled_time: self.policy.time_label.clone(),
            technician_id: technician.id.clone(),
            technician_name: technician.name.clone(),
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };

        tracing::info!(
            appointment_id = %appointment.id,
            call_id = %state.call_id,
            customer = %appointment.customer_name,
            technician = %appointment.technician_name,
            date = %appointment.scheduled_date,
            "Appointment booked"
        );

        if let Err(e) = self.appointments.insert(&appointment).await {
            tracing::warn!(
                appointment_id = %appointment.id,
                error = %e,
                "Failed to persist appointment, booking stands"
            );
        }

        if let Err(e) = self.notifier.send_confirmation(&appointment).await {
            tracing::warn!(
                appointment_id = %appointment.id,
                error = %e,
                "Failed to send confirmation SMS"
            );
        }

        Some(appointment)
    }
}
