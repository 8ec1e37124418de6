//! Prompt building for reply phrasing

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Build the message list asking the model to re-phrase one scripted reply
///
/// The model is constrained to wording only: the meaning, any pending
/// question, and any "Yes or No" instruction must survive, because the
/// deterministic flow has already decided the transition.
pub fn rephrase_messages(
    company: &str,
    step: &str,
    caller_name: Option<&str>,
    utterance: &str,
    scripted: &str,
) -> Vec<Message> {
    let system = format!(
        "You are a phone assistant for {company}, a home service company, \
         helping callers schedule repair appointments. You are given the \
         scripted reply for the current step of the call. Re-phrase it in \
         your own words. Keep the exact same meaning, keep every question \
         it asks, and keep any instruction to answer Yes or No. Do not add \
         new offers, times, or questions. Keep it short and natural for \
         voice.\n\
         Current step: {step}\n\
         Caller name: {name}",
        company = company,
        step = step,
        name = caller_name.unwrap_or("Not provided"),
    );

    let user = format!(
        "Caller said: {utterance}\nScripted reply: {scripted}",
        utterance = utterance,
        scripted = scripted,
    );

    vec![Message::system(system), Message::user(user)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_rephrase_messages() {
        let messages = rephrase_messages(
            "HomeDesk",
            "name_confirmation",
            Some("John Smith"),
            "yes",
            "Great! Now, what problem are you experiencing?",
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("HomeDesk"));
        assert!(messages[0].content.contains("John Smith"));
        assert!(messages[1].content.contains("Scripted reply"));
    }

    #[test]
    fn test_rephrase_messages_without_name() {
        let messages = rephrase_messages("HomeDesk", "greeting", None, "hello", "Hi!");
        assert!(messages[0].content.contains("Not provided"));
    }
}
