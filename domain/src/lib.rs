//! Domain layer for chat-relay
//!
//! This crate contains the core entities and pure logic of the relay.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A session is a short-lived conversation identified by an unguessable id.
//! Its history is owned by a [`SessionStore`]; everyone else works with
//! snapshots.
//!
//! ## Prompt assembly
//!
//! [`PromptAssembler`] turns a history snapshot, optional context snippets and
//! the new [`UserTurn`] into the ordered [`PromptMessage`] list sent to the
//! completion provider.

pub mod core;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use crate::core::error::DomainError;
pub use prompt::{PromptAssembler, PromptTemplate, UserTurn};
pub use session::{
    content::{ContentItem, ImageUrl, MessageContent, PromptMessage},
    entities::{Message, Role, Session},
    repository::SessionStore,
};
