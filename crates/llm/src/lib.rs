//! Language-model reply phrasing
//!
//! Optional chat-completions client used to re-phrase the scripted reply
//! for a conversation turn. The model never decides state transitions; it
//! only varies wording, and every failure falls back to the scripted text.

pub mod client;
pub mod prompt;

pub use client::{ChatClient, LlmError};
pub use prompt::{rephrase_messages, Message, Role};
