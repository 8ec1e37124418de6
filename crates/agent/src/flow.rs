//! Deterministic conversation flow
//!
//! `advance` is the single transition table for the call state machine.
//! Both reply strategies run through it: the language-model path may
//! re-phrase the canonical reply afterwards, but extraction and the step
//! transition are decided here and only here.

use crate::extract::{self, Polarity};
use crate::schedule::SlotPolicy;
use crate::state::CallState;
use crate::step::CallStep;

/// Result of one state-machine turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Canonical reply text for this turn
    pub reply: String,
    /// End the call after speaking the reply
    pub hangup: bool,
    /// Commit the booking as a side effect of this turn
    pub book: bool,
}

impl TurnOutcome {
    fn listen(reply: String) -> Self {
        Self {
            reply,
            hangup: false,
            book: false,
        }
    }

    fn hangup(reply: String) -> Self {
        Self {
            reply,
            hangup: true,
            book: false,
        }
    }
}

/// Canned reply phrasing for every step of the flow
#[derive(Debug, Clone)]
pub struct Script {
    company: String,
    slot_spoken: String,
}

impl Script {
    pub fn new(company: impl Into<String>, slot_spoken: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            slot_spoken: slot_spoken.into(),
        }
    }

    /// Opening prompt played when a call connects
    pub fn opening(&self) -> String {
        format!(
            "Hello! Welcome to {}, your trusted home service company. I'm here to help \
             you schedule a home service appointment. First, could you please tell me \
             your name?",
            self.company
        )
    }

    /// Reply when a turn fails internally; the caller may simply try again
    pub fn apology(&self) -> String {
        "I apologize, but I'm having trouble processing your request. Please try again \
         or call back later."
            .to_string()
    }

    fn confirm_name(&self, name: &str) -> String {
        format!("I heard {}. Is that correct? Please say Yes or No.", name)
    }

    fn reprompt_name(&self, name: &str) -> String {
        format!("Please say Yes or No. Is {} correct?", name)
    }

    fn ask_problem(&self) -> String {
        "Great! Now, what problem are you experiencing with your home that needs \
         service?"
            .to_string()
    }

    fn ask_spelling(&self) -> String {
        "I apologize. Could you please spell your name for me?".to_string()
    }

    fn thank_and_ask_problem(&self, name: &str) -> String {
        format!(
            "Thank you {}. Now, what problem are you experiencing with your home that \
             needs service?",
            name
        )
    }

    fn offer_slot(&self, problem: &str) -> String {
        format!(
            "I understand you have a problem with {}. I can schedule a technician for \
             {}. Does this time work for you? Please respond with Yes or No.",
            problem, self.slot_spoken
        )
    }

    fn reprompt_slot(&self) -> String {
        format!(
            "Please respond with Yes or No. Does {} work for you?",
            self.slot_spoken
        )
    }

    fn booked(&self) -> String {
        format!(
            "Perfect! I've scheduled your appointment for {}. You'll receive a \
             confirmation text shortly. Thank you for choosing {}!",
            self.slot_spoken, self.company
        )
    }

    fn declined(&self) -> String {
        format!(
            "I understand. Unfortunately, {} is the only available time we have. Thank \
             you for calling {}. Have a great day!",
            self.slot_spoken, self.company
        )
    }

    fn confirmed_closing(&self) -> String {
        format!(
            "Your appointment has been confirmed for {}. You'll receive a confirmation \
             text shortly. Thank you for choosing {}!",
            self.slot_spoken, self.company
        )
    }

    fn goodbye(&self) -> String {
        format!("Thank you for calling {}. Have a great day!", self.company)
    }
}

/// Run one turn of the state machine
///
/// Mutates `state` in place and returns the canonical reply plus the
/// hangup/booking directives. Ambiguous answers at yes/no steps leave the
/// state untouched and re-ask the pending question.
pub fn advance(
    state: &mut CallState,
    utterance: &str,
    script: &Script,
    policy: &SlotPolicy,
) -> TurnOutcome {
    match state.step {
        CallStep::Greeting => {
            let name = extract::spoken_name(utterance).to_string();
            let reply = script.confirm_name(&name);
            state.caller_name = Some(name);
            state.step = CallStep::NameConfirmation;
            TurnOutcome::listen(reply)
        }

        CallStep::NameConfirmation => match extract::yes_no(utterance) {
            Polarity::Affirmative => {
                state.step = CallStep::Problem;
                TurnOutcome::listen(script.ask_problem())
            }
            Polarity::Negative => {
                state.step = CallStep::NameSpelling;
                TurnOutcome::listen(script.ask_spelling())
            }
            Polarity::Ambiguous => {
                let name = state.caller_name.as_deref().unwrap_or_default();
                TurnOutcome::listen(script.reprompt_name(name))
            }
        },

        CallStep::NameSpelling => {
            let name = extract::spoken_name(utterance).to_string();
            let reply = script.thank_and_ask_problem(&name);
            state.caller_name = Some(name);
            state.step = CallStep::Problem;
            TurnOutcome::listen(reply)
        }

        CallStep::Problem => {
            state.problem = Some(utterance.to_string());
            state.proposed_date = Some(policy.date_label());
            state.proposed_time = Some(policy.time_label.clone());
            state.step = CallStep::Scheduling;
            TurnOutcome::listen(script.offer_slot(utterance))
        }

        CallStep::Scheduling => match extract::slot_answer(utterance) {
            Polarity::Affirmative => {
                state.confirmed = Some(true);
                state.step = CallStep::Confirmation;
                TurnOutcome {
                    reply: script.booked(),
                    hangup: true,
                    book: true,
                }
            }
            Polarity::Negative => {
                state.confirmed = Some(false);
                state.step = CallStep::Final;
                TurnOutcome::hangup(script.declined())
            }
            Polarity::Ambiguous => TurnOutcome::listen(script.reprompt_slot()),
        },

        CallStep::Confirmation => {
            state.step = CallStep::Final;
            TurnOutcome::hangup(script.confirmed_closing())
        }

        CallStep::Final => TurnOutcome::hangup(script.goodbye()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> Script {
        Script::new("HomeDesk", "tomorrow morning at 10 AM")
    }

    fn policy() -> SlotPolicy {
        SlotPolicy::default()
    }

    #[test]
    fn test_greeting_captures_name() {
        let mut state = CallState::new("CA1");

        let outcome = advance(&mut state, "  John Smith ", &script(), &policy());

        assert_eq!(state.step, CallStep::NameConfirmation);
        assert_eq!(state.caller_name.as_deref(), Some("John Smith"));
        assert!(outcome.reply.contains("John Smith"));
        assert!(outcome.reply.contains("Yes or No"));
        assert!(!outcome.hangup);
    }

    #[test]
    fn test_name_confirmed_moves_to_problem() {
        let mut state = CallState::new("CA1");
        advance(&mut state, "John Smith", &script(), &policy());

        let outcome = advance(&mut state, "Yes", &script(), &policy());

        assert_eq!(state.step, CallStep::Problem);
        assert!(outcome.reply.contains("what problem"));
    }

    #[test]
    fn test_name_rejected_moves_to_spelling() {
        let mut state = CallState::new("CA1");
        advance(&mut state, "Jon Smyth", &script(), &policy());

        let outcome = advance(&mut state, "No", &script(), &policy());
        assert_eq!(state.step, CallStep::NameSpelling);
        assert!(outcome.reply.contains("spell"));

        // Spelled name overwrites and advances forward, never back
        advance(&mut state, "John Smith", &script(), &policy());
        assert_eq!(state.step, CallStep::Problem);
        assert_eq!(state.caller_name.as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_ambiguous_confirmation_reprompts_without_advancing() {
        let mut state = CallState::new("CA1");
        advance(&mut state, "John Smith", &script(), &policy());
        let before = state.clone();

        let outcome = advance(&mut state, "ummm", &script(), &policy());

        assert_eq!(state.step, before.step);
        assert_eq!(state.caller_name, before.caller_name);
        assert!(outcome.reply.contains("Yes or No"));
        assert!(outcome.reply.contains("John Smith"));
    }

    #[test]
    fn test_problem_sets_slot_and_moves_to_scheduling() {
        let mut state = CallState::new("CA1");
        advance(&mut state, "John Smith", &script(), &policy());
        advance(&mut state, "Yes", &script(), &policy());

        let outcome = advance(&mut state, "My dishwasher is broken", &script(), &policy());

        assert_eq!(state.step, CallStep::Scheduling);
        assert_eq!(state.problem.as_deref(), Some("My dishwasher is broken"));
        assert_eq!(state.proposed_date.as_deref(), Some("tomorrow"));
        assert_eq!(state.proposed_time.as_deref(), Some("10:00 AM"));
        assert!(outcome.reply.contains("My dishwasher is broken"));
    }

    #[test]
    fn test_slot_accepted_books_and_hangs_up() {
        let mut state = CallState::new("CA1");
        advance(&mut state, "John Smith", &script(), &policy());
        advance(&mut state, "Yes", &script(), &policy());
        advance(&mut state, "My dishwasher is broken", &script(), &policy());

        let outcome = advance(&mut state, "Yes", &script(), &policy());

        assert_eq!(state.step, CallStep::Confirmation);
        assert_eq!(state.confirmed, Some(true));
        assert!(outcome.book);
        assert!(outcome.hangup);
        assert!(outcome.reply.contains("scheduled your appointment"));
    }

    #[test]
    fn test_slot_declined_ends_without_booking() {
        let mut state = CallState::new("CA1");
        advance(&mut state, "John Smith", &script(), &policy());
        advance(&mut state, "Yes", &script(), &policy());
        advance(&mut state, "leaky pipe", &script(), &policy());

        let outcome = advance(&mut state, "No", &script(), &policy());

        assert_eq!(state.step, CallStep::Final);
        assert_eq!(state.confirmed, Some(false));
        assert!(!outcome.book);
        assert!(outcome.hangup);
        assert!(outcome.reply.contains("only available time"));
    }

    #[test]
    fn test_ambiguous_slot_answer_reprompts() {
        let mut state = CallState::new("CA1");
        advance(&mut state, "John Smith", &script(), &policy());
        advance(&mut state, "Yes", &script(), &policy());
        advance(&mut state, "leaky pipe", &script(), &policy());
        let before = state.clone();

        let outcome = advance(&mut state, "let me think", &script(), &policy());

        assert_eq!(state.step, before.step);
        assert_eq!(state.confirmed, None);
        assert!(!outcome.book);
        assert!(outcome.reply.contains("Yes or No"));
    }

    #[test]
    fn test_final_step_stays_final() {
        let mut state = CallState::new("CA1");
        state.step = CallStep::Final;

        let outcome = advance(&mut state, "hello?", &script(), &policy());

        assert_eq!(state.step, CallStep::Final);
        assert!(outcome.hangup);
    }
}
