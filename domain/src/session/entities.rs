//! Session domain entities

use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

/// A persisted message in a conversation (Entity)
///
/// Content is always plain text; image payloads are flattened to a marker
/// before they reach the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Set when the provider failed to answer this user turn
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unanswered: bool,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::with_timestamp(role, content, Utc::now())
    }

    pub fn with_timestamp(role: Role, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp,
            unanswered: false,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A conversation session (Entity)
///
/// Cloning a session is cheap: the message list is shared behind an [`Arc`]
/// and copied only when a shared list is appended to. A clone therefore acts
/// as a stable snapshot of the history at the time it was taken.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    messages: Arc<Vec<Message>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session with a fresh random (UUID v4) id
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Arc::new(Vec::new()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Append a message stamped with the current time and return a copy of it.
    ///
    /// The timestamp never goes backwards relative to `updated_at`, so
    /// `updated_at` stays monotonic even if the wall clock is adjusted.
    pub fn push_message(&mut self, role: Role, content: impl Into<String>) -> Message {
        let now = Utc::now().max(self.updated_at);
        let message = Message::with_timestamp(role, content, now);
        Arc::make_mut(&mut self.messages).push(message.clone());
        self.updated_at = now;
        message
    }

    /// Remove a message by id. Returns `false` if no such message exists.
    pub fn remove_message(&mut self, message_id: &str) -> bool {
        let Some(index) = self.messages.iter().position(|m| m.id == message_id) else {
            return false;
        };
        Arc::make_mut(&mut self.messages).remove(index);
        true
    }

    /// Flag a message as unanswered. Returns `false` if no such message exists.
    pub fn mark_unanswered(&mut self, message_id: &str) -> bool {
        let Some(index) = self.messages.iter().position(|m| m.id == message_id) else {
            return false;
        };
        Arc::make_mut(&mut self.messages)[index].unanswered = true;
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
