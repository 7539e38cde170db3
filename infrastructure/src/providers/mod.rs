//! Completion provider adapters.

mod openai;

pub use openai::{DEFAULT_MAX_TOKENS, OpenAiCompatibleProvider};
