//! OpenAI-compatible chat completions adapter.
//!
//! Talks to any endpoint that implements `POST {base_url}/chat/completions`
//! (OpenAI, Azure OpenAI, vLLM, Ollama, LiteLLM and similar gateways).

use async_trait::async_trait;
use relay_application::ports::completion_provider::{CompletionProvider, ProviderError};
use relay_domain::PromptMessage;
use relay_domain::util::preview;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default reply budget sent as `max_tokens`.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// [`CompletionProvider`] for OpenAI-style chat completion APIs.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiCompatibleProvider {
    /// Create a provider for `model` at `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ProviderError> {
        let url = self.endpoint();
        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        };

        debug!(
            model = %self.model,
            messages = messages.len(),
            "POST {}",
            url
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Completion request rejected: {}", preview(&body, 200));
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyChoices)?;

        let reply = match choice.message.content {
            serde_json::Value::Null => return Err(ProviderError::EmptyChoices),
            serde_json::Value::String(text) => text,
            // Structured content is passed through as its JSON text
            other => other.to_string(),
        };

        debug!(bytes = reply.len(), "Completion received");
        Ok(reply)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: serde_json::Value,
}
