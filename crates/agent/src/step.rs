//! Call flow steps

use serde::{Deserialize, Serialize};

/// Step of one scheduling conversation
///
/// Steps only advance forward: greeting -> name_confirmation ->
/// (name_spelling ->) problem -> scheduling -> confirmation -> final. The
/// name_spelling detour is the single branch; nothing ever regresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStep {
    /// Waiting for the caller to state their name
    #[default]
    Greeting,
    /// Caller must confirm the captured name
    NameConfirmation,
    /// Caller re-states (spells) the name after rejecting it
    NameSpelling,
    /// Waiting for the service problem description
    Problem,
    /// Slot proposed, waiting for accept/decline
    Scheduling,
    /// Slot accepted, booking committed
    Confirmation,
    /// Conversation over, no further transitions
    Final,
}

impl CallStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStep::Greeting => "greeting",
            CallStep::NameConfirmation => "name_confirmation",
            CallStep::NameSpelling => "name_spelling",
            CallStep::Problem => "problem",
            CallStep::Scheduling => "scheduling",
            CallStep::Confirmation => "confirmation",
            CallStep::Final => "final",
        }
    }

    /// Terminal steps accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStep::Final)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_greeting() {
        assert_eq!(CallStep::default(), CallStep::Greeting);
    }

    #[test]
    fn test_terminal() {
        assert!(CallStep::Final.is_terminal());
        assert!(!CallStep::Confirmation.is_terminal());
        assert!(!CallStep::Greeting.is_terminal());
    }

    #[test]
    fn test_as_str() {
        assert_eq!(CallStep::NameConfirmation.as_str(), "name_confirmation");
        assert_eq!(CallStep::Final.as_str(), "final");
    }
}
