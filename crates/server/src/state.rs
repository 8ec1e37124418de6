//! Application state
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use homedesk_agent::{
    AgentOptions, LlmGenerator, ReplyGenerator, SchedulingAgent, ScriptedGenerator,
};
use homedesk_config::Settings;
use homedesk_llm::ChatClient;
use homedesk_persistence::PersistenceLayer;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Settings>,
    /// Conversation orchestrator
    pub agent: Arc<SchedulingAgent>,
}

impl AppState {
    pub fn new(config: Settings, agent: Arc<SchedulingAgent>) -> Self {
        Self {
            config: Arc::new(config),
            agent,
        }
    }

    /// State backed entirely by in-memory stores
    pub fn in_memory(config: Settings) -> Self {
        let persistence = homedesk_persistence::in_memory(&config.business.company_name);
        let agent = build_agent(&config, persistence);
        Self::new(config, agent)
    }
}

/// Build the orchestrator, selecting the reply strategy from configuration
///
/// The language model only re-phrases replies and is selected by the
/// presence of an API key; without one the scripted generator serves every
/// turn.
pub fn build_agent(settings: &Settings, persistence: PersistenceLayer) -> Arc<SchedulingAgent> {
    let generator: Arc<dyn ReplyGenerator> =
        if settings.agent.llm_replies && settings.llm.api_key.is_some() {
            tracing::info!(model = %settings.llm.model, "Using language-model reply phrasing");
            Arc::new(LlmGenerator::new(
                ChatClient::new(&settings.llm),
                Duration::from_millis(settings.agent.llm_timeout_ms),
            ))
        } else {
            tracing::info!("Using scripted replies");
            Arc::new(ScriptedGenerator)
        };

    Arc::new(SchedulingAgent::new(
        AgentOptions::from_config(&settings.agent, &settings.business),
        generator,
        persistence.turns,
        persistence.appointments,
        persistence.notifier,
    ))
}
