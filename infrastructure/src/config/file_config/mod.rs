//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use application types where appropriate.

mod chat;
mod llm;
mod logging;
mod server;

pub use chat::FileChatConfig;
pub use llm::FileLlmConfig;
pub use logging::FileLoggingConfig;
pub use server::{DEFAULT_MAX_BODY_BYTES, FileServerConfig};

use relay_application::config::ChatParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const REDACTED: &str = "********";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("llm.api_key is not set (use LLM_API_KEY or the [llm] section)")]
    MissingApiKey,

    #[error("server.port cannot be 0")]
    InvalidPort,

    #[error("server.max_body_bytes cannot be 0")]
    InvalidBodyLimit,

    #[error("llm.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("llm.model cannot be empty")]
    EmptyModelName,

    #[error("llm.base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener
    pub server: FileServerConfig,
    /// Completion endpoint
    pub llm: FileLlmConfig,
    /// Prompt and failure handling
    pub chat: FileChatConfig,
    /// Log sinks
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.llm.api_key().is_none() {
            return Err(ConfigValidationError::MissingApiKey);
        }
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigValidationError::InvalidBodyLimit);
        }
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        Ok(())
    }

    /// Chat settings including the provider timeout from `[llm]`
    pub fn to_chat_params(&self) -> ChatParams {
        self.chat
            .to_chat_params()
            .with_provider_timeout(Some(self.llm.timeout()))
    }

    /// Copy with secrets replaced, for printing
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.llm.api_key.is_some() {
            config.llm.api_key = Some(REDACTED.to_string());
        }
        config
    }

    /// Effective configuration as TOML with secrets redacted
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&self.redacted())
    }
}
