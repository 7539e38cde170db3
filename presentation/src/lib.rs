//! Presentation layer for chat-relay
//!
//! This crate contains the CLI definition and the HTTP binding (axum router,
//! request/response bodies and error mapping).

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{AppState, RouterOptions, build_router};
