//! Conversation turn types
//!
//! One `Turn` per recognized caller utterance or generated reply. Turns are
//! append-only and never mutated after being recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker role for a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Caller,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::Caller => "caller",
            TurnRole::Assistant => "assistant",
        }
    }

    /// Parse a stored role string; unknown values default to `Caller`
    pub fn parse(s: &str) -> Self {
        match s {
            "assistant" => TurnRole::Assistant,
            _ => TurnRole::Caller,
        }
    }
}

/// One exchange unit of a call transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Call identifier supplied by the telephony layer
    pub call_id: String,
    /// Who spoke
    pub role: TurnRole,
    /// Recognized or generated text
    pub content: String,
    /// Wall-clock time the turn was recorded
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a caller turn stamped now
    pub fn caller(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            role: TurnRole::Caller,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant turn stamped now
    pub fn assistant(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
