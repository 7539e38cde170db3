//! Application-level configuration.
//!
//! - [`ChatParams`]: system prompt, image marker, provider timeout, failed-turn handling

pub mod chat_params;

pub use chat_params::{ChatParams, FailedTurnPolicy};
