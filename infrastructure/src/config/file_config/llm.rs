//! Completion endpoint configuration from TOML (`[llm]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// API root, `/chat/completions` is appended (default: "https://api.openai.com/v1")
    pub base_url: String,
    /// Bearer token; usually supplied through `LLM_API_KEY`
    pub api_key: Option<String>,
    /// Model name sent with every request (default: "gpt-4o")
    pub model: String,
    /// Reply budget sent as `max_tokens` (default: 2000)
    pub max_tokens: u32,
    /// Upper bound for one completion call in seconds (default: 120)
    pub timeout_seconds: u64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o".to_string(),
            max_tokens: 2000,
            timeout_seconds: 120,
        }
    }
}

impl FileLlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// The API key with surrounding whitespace removed, if one is set
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
