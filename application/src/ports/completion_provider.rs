//! Completion provider port
//!
//! Defines the interface for asking an external language model for a reply.

use async_trait::async_trait;
use relay_domain::PromptMessage;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while calling a completion provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("No choices returned in response")]
    EmptyChoices,

    #[error("Provider did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Other error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Check if this error represents a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(_))
    }
}

/// Gateway to a language-model completion endpoint
///
/// Implementations (adapters) live in the infrastructure layer and own the
/// wire format: they serialize [`PromptMessage`]s, perform the call and map
/// transport, status and decoding failures to [`ProviderError`].
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Send the assembled messages and return the reply text
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ProviderError>;
}
