//! Chat parameters: how a chat turn is run.
//!
//! [`ChatParams`] groups the static settings read by
//! [`ChatUseCase`](crate::use_cases::chat::ChatUseCase): the system prompt,
//! the marker stored for image turns, the provider timeout and what happens to
//! a user turn the provider never answered.

use relay_domain::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do with a recorded user turn when the provider call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedTurnPolicy {
    /// Leave the user turn in the history unchanged
    #[default]
    Keep,
    /// Remove the user turn again
    Rollback,
    /// Keep the user turn but flag it as unanswered
    MarkUnanswered,
}

impl FailedTurnPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailedTurnPolicy::Keep => "keep",
            FailedTurnPolicy::Rollback => "rollback",
            FailedTurnPolicy::MarkUnanswered => "mark_unanswered",
        }
    }
}

impl std::fmt::Display for FailedTurnPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FailedTurnPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "keep" => Ok(FailedTurnPolicy::Keep),
            "rollback" => Ok(FailedTurnPolicy::Rollback),
            "mark_unanswered" | "mark" => Ok(FailedTurnPolicy::MarkUnanswered),
            other => Err(format!(
                "unknown failed turn policy '{}' (expected keep, rollback or mark_unanswered)",
                other
            )),
        }
    }
}

/// Settings for a chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatParams {
    /// System prompt placed first in every prompt.
    pub system_prompt: String,
    /// Suffix stored in the history instead of image payloads.
    pub image_marker: String,
    /// Upper bound for one provider call; `None` waits indefinitely.
    pub provider_timeout: Option<Duration>,
    /// Handling of user turns the provider failed to answer.
    pub failed_turn_policy: FailedTurnPolicy,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            system_prompt: PromptTemplate::default_system().to_string(),
            image_marker: PromptTemplate::DEFAULT_IMAGE_MARKER.to_string(),
            provider_timeout: Some(Duration::from_secs(120)),
            failed_turn_policy: FailedTurnPolicy::Keep,
        }
    }
}

impl ChatParams {
    // ==================== Builder Methods ====================

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_image_marker(mut self, marker: impl Into<String>) -> Self {
        self.image_marker = marker.into();
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_failed_turn_policy(mut self, policy: FailedTurnPolicy) -> Self {
        self.failed_turn_policy = policy;
        self
    }
}
