//! Infrastructure layer for chat-relay
//!
//! This crate contains adapters that implement the ports defined in the
//! domain and application layers: the in-memory session store, the
//! OpenAI-compatible completion provider, configuration file loading and the
//! JSONL conversation logger.

pub mod config;
pub mod logging;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileChatConfig, FileConfig, FileLlmConfig,
    FileLoggingConfig, FileServerConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{DEFAULT_MAX_TOKENS, OpenAiCompatibleProvider};
pub use session::InMemorySessionStore;
