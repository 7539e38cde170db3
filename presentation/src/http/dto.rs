//! Request and response bodies of the HTTP API.
//!
//! Field names follow the browser frontend (`sessionId`, `messageContent`).

use chrono::{DateTime, Utc};
use relay_domain::{ContentItem, Message, Session};
use serde::{Deserialize, Serialize};

/// `POST /api/session` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    /// "create" or "get"
    pub action: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionResponse {
    /// Reply to "create": only the new id.
    pub fn created(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            messages: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Reply to "get": the full transcript.
    pub fn transcript(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            messages: Some(session.messages().to_vec()),
            created_at: Some(session.created_at()),
            updated_at: Some(session.updated_at()),
        }
    }
}

/// `POST /api/chat` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub context: Option<Vec<String>>,
    #[serde(default)]
    pub message_content: Option<Vec<ContentItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions: usize,
}
