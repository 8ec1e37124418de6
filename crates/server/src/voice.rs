//! Telephony webhooks
//!
//! The provider posts form-encoded events here: call connected, speech
//! recognized, call ended. Replies are telephony markup (see
//! [`crate::telephony`]).

use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::state::AppState;
use crate::telephony;

#[derive(Debug, Deserialize)]
pub struct IncomingCallForm {
    #[serde(rename = "CallSid")]
    pub call_sid: String,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
    #[serde(rename = "To", default)]
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeechForm {
    #[serde(rename = "CallSid")]
    pub call_sid: String,
    #[serde(rename = "SpeechResult", default)]
    pub speech_result: String,
    #[serde(rename = "Confidence", default)]
    pub confidence: Option<f32>,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteForm {
    #[serde(rename = "CallSid")]
    pub call_sid: String,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
}

fn xml(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/xml")], body)
}

/// Call connected: play the opening greeting and start listening
pub async fn incoming_call(
    State(state): State<AppState>,
    Form(form): Form<IncomingCallForm>,
) -> impl IntoResponse {
    tracing::info!(
        call_id = %form.call_sid,
        from = ?form.from,
        to = ?form.to,
        "Incoming call"
    );

    xml(telephony::render(&state.agent.greeting(), false))
}

/// Recognized speech: run one conversation turn
pub async fn speech(
    State(state): State<AppState>,
    Form(form): Form<SpeechForm>,
) -> impl IntoResponse {
    tracing::info!(
        call_id = %form.call_sid,
        speech = %form.speech_result,
        confidence = ?form.confidence,
        "Speech received"
    );

    let reply = state
        .agent
        .handle_utterance(&form.call_sid, &form.speech_result, form.from.as_deref())
        .await;

    xml(telephony::render(&reply.text, reply.hangup))
}

/// Call ended: finalize any eligible booking and drop the call state
pub async fn complete(
    State(state): State<AppState>,
    Form(form): Form<CompleteForm>,
) -> impl IntoResponse {
    tracing::info!(call_id = %form.call_sid, "Call completed");

    state
        .agent
        .handle_call_completion(&form.call_sid, form.from.as_deref())
        .await;

    (StatusCode::OK, "Call completed")
}
