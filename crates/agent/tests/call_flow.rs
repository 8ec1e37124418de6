//! End-to-end conversation tests over in-memory backends

use std::sync::Arc;

use homedesk_agent::{AgentOptions, SchedulingAgent, ScriptedGenerator};
use homedesk_persistence::{MemoryAppointmentStore, MemoryNotifier, MemoryTurnStore};

fn build_agent(max_active_calls: usize) -> (SchedulingAgent, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new("HomeDesk"));
    let agent = SchedulingAgent::new(
        AgentOptions {
            max_active_calls,
            ..AgentOptions::default()
        },
        Arc::new(ScriptedGenerator),
        Arc::new(MemoryTurnStore::new()),
        Arc::new(MemoryAppointmentStore::new()),
        notifier.clone(),
    );
    (agent, notifier)
}

#[tokio::test]
async fn happy_path_books_exactly_one_appointment() {
    let (agent, notifier) = build_agent(10);

    let greeting = agent.greeting();
    assert!(greeting.contains("your name"));

    let reply = agent
        .handle_utterance("CA1", "John Smith", Some("+15551234567"))
        .await;
    assert!(reply.text.contains("John Smith"));
    assert!(reply.text.contains("Yes or No"));
    assert!(!reply.hangup);

    let reply = agent.handle_utterance("CA1", "Yes", None).await;
    assert!(reply.text.contains("what problem"));

    let reply = agent
        .handle_utterance("CA1", "My dishwasher is broken", None)
        .await;
    assert!(reply.text.contains("My dishwasher is broken"));
    assert!(reply.text.contains("Yes or No"));

    let reply = agent.handle_utterance("CA1", "Yes", None).await;
    assert!(reply.hangup, "accepting the slot must end the call");
    assert!(reply.text.contains("scheduled your appointment"));

    let appointments = agent.appointments().await.unwrap();
    assert_eq!(appointments.len(), 1);

    let appointment = &appointments[0];
    assert_eq!(appointment.call_id, "CA1");
    assert_eq!(appointment.customer_name, "John Smith");
    assert_eq!(appointment.customer_phone, "+15551234567");
    assert_eq!(appointment.problem, "My dishwasher is broken");
    assert_eq!(appointment.scheduled_time, "10:00 AM");
    assert_eq!(appointment.technician_id, "tech-001");

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("John Smith"));
}

#[tokio::test]
async fn declining_the_slot_books_nothing() {
    let (agent, notifier) = build_agent(10);

    agent.handle_utterance("CA2", "Jane Roe", None).await;
    agent.handle_utterance("CA2", "Yes", None).await;
    agent.handle_utterance("CA2", "leaky pipe", None).await;
    let reply = agent.handle_utterance("CA2", "No", None).await;

    assert!(reply.hangup);
    assert!(reply.text.contains("only available time"));

    assert!(agent.appointments().await.unwrap().is_empty());
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn rejected_name_is_respelled_and_never_reconfirmed() {
    let (agent, _) = build_agent(10);

    agent.handle_utterance("CA3", "Jon Smyth", None).await;
    let reply = agent.handle_utterance("CA3", "No", None).await;
    assert!(reply.text.contains("spell"));

    // The corrected name advances straight to the problem question
    let reply = agent.handle_utterance("CA3", "John Smith", None).await;
    assert!(reply.text.contains("Thank you John Smith"));
    assert!(reply.text.contains("what problem"));

    agent.handle_utterance("CA3", "broken wiring", None).await;
    agent.handle_utterance("CA3", "sure", None).await;

    let appointments = agent.appointments().await.unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].customer_name, "John Smith");
    // "wiring" routes to the first technician carrying the electrical specialty
    assert_eq!(appointments[0].technician_id, "tech-001");
}

#[tokio::test]
async fn ambiguous_answers_reprompt_without_advancing() {
    let (agent, _) = build_agent(10);

    agent.handle_utterance("CA4", "John Smith", None).await;

    let reply = agent.handle_utterance("CA4", "ummm", None).await;
    assert!(reply.text.contains("Please say Yes or No"));
    assert!(reply.text.contains("John Smith"));
    assert!(!reply.hangup);

    // The pending step still accepts a proper answer
    let reply = agent.handle_utterance("CA4", "yes", None).await;
    assert!(reply.text.contains("what problem"));
}

#[tokio::test]
async fn completion_without_state_is_a_noop() {
    let (agent, notifier) = build_agent(10);

    agent.handle_call_completion("CA-unknown", None).await;

    assert!(agent.appointments().await.unwrap().is_empty());
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn completion_of_unconfirmed_call_books_nothing() {
    let (agent, notifier) = build_agent(10);

    agent.handle_utterance("CA5", "John Smith", None).await;
    agent.handle_utterance("CA5", "Yes", None).await;

    agent.handle_call_completion("CA5", Some("+15550000000")).await;

    assert!(agent.appointments().await.unwrap().is_empty());
    assert!(notifier.sent().is_empty());
    assert_eq!(agent.active_calls(), 0);
}

#[tokio::test]
async fn completion_after_immediate_commit_stays_idempotent() {
    let (agent, notifier) = build_agent(10);

    agent.handle_utterance("CA6", "John Smith", None).await;
    agent.handle_utterance("CA6", "Yes", None).await;
    agent.handle_utterance("CA6", "dishwasher leaking", None).await;
    agent.handle_utterance("CA6", "Yes", None).await;

    agent.handle_call_completion("CA6", None).await;
    agent.handle_call_completion("CA6", None).await;

    assert_eq!(agent.appointments().await.unwrap().len(), 1);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn unsupplied_phone_falls_back_to_unknown() {
    let (agent, _) = build_agent(10);

    agent.handle_utterance("CA7", "John Smith", None).await;
    agent.handle_utterance("CA7", "Yes", None).await;
    agent.handle_utterance("CA7", "stove broken", None).await;
    agent.handle_utterance("CA7", "okay", None).await;

    let appointments = agent.appointments().await.unwrap();
    assert_eq!(appointments[0].customer_phone, "unknown");
}

#[tokio::test]
async fn transcript_records_both_sides() {
    let (agent, _) = build_agent(10);

    agent.handle_utterance("CA8", "John Smith", None).await;
    agent.handle_utterance("CA8", "Yes", None).await;

    let transcript = agent.transcript("CA8").await.unwrap();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[0].content, "John Smith");
    assert!(transcript[1].content.contains("Is that correct"));
}

#[tokio::test]
async fn over_capacity_calls_get_the_apology_reply() {
    let (agent, _) = build_agent(1);

    agent.handle_utterance("CA9", "John Smith", None).await;

    let reply = agent.handle_utterance("CA10", "Jane Roe", None).await;
    assert!(reply.text.contains("I apologize"));
    assert!(!reply.hangup);

    // The active call is unaffected
    let reply = agent.handle_utterance("CA9", "Yes", None).await;
    assert!(reply.text.contains("what problem"));
}
