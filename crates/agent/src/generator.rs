//! Reply phrasing strategies
//!
//! The state machine produces a canonical scripted reply for every turn;
//! a `ReplyGenerator` may re-word it. Strategies only ever change phrasing:
//! extraction and transitions are decided before the generator runs, and
//! the orchestrator falls back to the scripted text when a generator fails.

use std::time::Duration;

use async_trait::async_trait;

use homedesk_llm::{rephrase_messages, ChatClient};

use crate::state::CallState;
use crate::AgentError;

/// Everything a generator may look at when phrasing a reply
pub struct ReplyContext<'a> {
    pub company: &'a str,
    pub state: &'a CallState,
    /// The caller utterance that produced this turn
    pub utterance: &'a str,
    /// Canonical reply decided by the flow
    pub scripted: &'a str,
}

/// Strategy for wording the reply of one turn
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn render(&self, ctx: &ReplyContext<'_>) -> Result<String, AgentError>;

    fn name(&self) -> &'static str;
}

/// Deterministic generator: the scripted reply verbatim
#[derive(Debug, Default)]
pub struct ScriptedGenerator;

#[async_trait]
impl ReplyGenerator for ScriptedGenerator {
    async fn render(&self, ctx: &ReplyContext<'_>) -> Result<String, AgentError> {
        Ok(ctx.scripted.to_string())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Language-model generator: asks a chat model to re-phrase the scripted
/// reply, bounded by a timeout and never retried within a turn
pub struct LlmGenerator {
    client: ChatClient,
    timeout: Duration,
}

impl LlmGenerator {
    pub fn new(client: ChatClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl ReplyGenerator for LlmGenerator {
    async fn render(&self, ctx: &ReplyContext<'_>) -> Result<String, AgentError> {
        let messages = rephrase_messages(
            ctx.company,
            ctx.state.step.as_str(),
            ctx.state.caller_name.as_deref(),
            ctx.utterance,
            ctx.scripted,
        );

        let completion = tokio::time::timeout(self.timeout, self.client.complete(&messages))
            .await
            .map_err(|_| AgentError::Generation("completion timed out".to_string()))?
            .map_err(|e| AgentError::Generation(e.to_string()))?;

        Ok(completion)
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_generator_echoes() {
        let state = CallState::new("CA1");
        let ctx = ReplyContext {
            company: "HomeDesk",
            state: &state,
            utterance: "hello",
            scripted: "Hi! What's your name?",
        };

        let reply = ScriptedGenerator.render(&ctx).await.unwrap();
        assert_eq!(reply, "Hi! What's your name?");
    }

    #[tokio::test]
    async fn test_llm_generator_fails_without_key() {
        let client = ChatClient::new(&homedesk_config::LlmConfig::default());
        let generator = LlmGenerator::new(client, Duration::from_millis(500));

        let state = CallState::new("CA1");
        let ctx = ReplyContext {
            company: "HomeDesk",
            state: &state,
            utterance: "hello",
            scripted: "Hi!",
        };

        assert!(generator.render(&ctx).await.is_err());
    }
}
