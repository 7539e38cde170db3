//! Transcript port.
//!
//! [`ChatUseCase`](crate::use_cases::chat::ChatUseCase) reports three events
//! per turn: the recorded user turn, then either the provider reply or the
//! failure together with the policy applied to the unanswered turn. Adapters
//! decide where they go (see the JSONL logger in the infrastructure crate).

use serde_json::{Value, json};

/// One transcript record: an event name and its JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub const CHAT_REQUEST: &'static str = "chat_request";
    pub const CHAT_RESPONSE: &'static str = "chat_response";
    pub const CHAT_FAILED: &'static str = "chat_failed";

    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// User turn stored and prompt sent to `provider`.
    ///
    /// `text` is the stored form of the turn, so image payloads never reach
    /// the transcript.
    pub fn chat_request(
        session_id: &str,
        provider: &str,
        prompt_messages: usize,
        context_snippets: usize,
        multimodal: bool,
        text: &str,
    ) -> Self {
        Self::new(
            Self::CHAT_REQUEST,
            json!({
                "session_id": session_id,
                "provider": provider,
                "messages": prompt_messages,
                "context_snippets": context_snippets,
                "multimodal": multimodal,
                "text": text,
            }),
        )
    }

    pub fn chat_response(session_id: &str, provider: &str, reply: &str) -> Self {
        Self::new(
            Self::CHAT_RESPONSE,
            json!({
                "session_id": session_id,
                "provider": provider,
                "bytes": reply.len(),
                "text": reply,
            }),
        )
    }

    /// Provider call failed; `policy` names what happened to the user turn.
    pub fn chat_failed(session_id: &str, error: &str, policy: &str) -> Self {
        Self::new(
            Self::CHAT_FAILED,
            json!({
                "session_id": session_id,
                "error": error,
                "policy": policy,
            }),
        )
    }
}

/// Sink for transcript events.
///
/// Infallible: a sink that cannot write must not fail the chat turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
