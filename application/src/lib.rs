//! Application layer for chat-relay
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatParams, FailedTurnPolicy};
pub use ports::{
    completion_provider::{CompletionProvider, ProviderError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
};
pub use use_cases::chat::{ChatError, ChatInput, ChatOutput, ChatUseCase};
pub use use_cases::manage_session::{ManageSessionUseCase, SessionError};
