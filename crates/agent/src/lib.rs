//! Conversation core for the homedesk scheduling assistant
//!
//! Features:
//! - Step-based call flow (greeting through booking)
//! - Deterministic utterance extraction (substring keyword matching)
//! - Pluggable reply phrasing (scripted or language-model backed)
//! - Per-call state store with capacity limits
//! - Technician assignment and appointment commit with an idempotency
//!   guard across the two commit trigger paths

pub mod extract;
pub mod flow;
pub mod generator;
pub mod orchestrator;
pub mod schedule;
pub mod state;
pub mod step;
pub mod technician;

pub use extract::Polarity;
pub use flow::{Script, TurnOutcome};
pub use generator::{LlmGenerator, ReplyContext, ReplyGenerator, ScriptedGenerator};
pub use orchestrator::{AgentOptions, SchedulingAgent, TurnReply};
pub use schedule::SlotPolicy;
pub use state::{CallState, CallStateStore};
pub use step::CallStep;
pub use technician::{assign_technician, default_roster};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Call capacity reached ({0} active calls)")]
    CapacityExceeded(usize),

    #[error("Conversation error: {0}")]
    Conversation(String),

    #[error("Reply generation error: {0}")]
    Generation(String),
}

impl From<AgentError> for homedesk_core::Error {
    fn from(e: AgentError) -> Self {
        homedesk_core::Error::Agent(e.to_string())
    }
}
