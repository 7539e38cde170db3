//! Conversation session domain.
//!
//! - [`entities::Session`]: a conversation with its ordered message history
//! - [`entities::Message`]: a single persisted message
//! - [`content::PromptMessage`]: a message on its way to the completion provider
//! - [`repository::SessionStore`]: trait for the session registry

pub mod content;
pub mod entities;
pub mod repository;
