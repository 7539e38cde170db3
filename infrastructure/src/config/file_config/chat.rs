//! Chat behaviour from TOML (`[chat]` section)

use relay_application::config::{ChatParams, FailedTurnPolicy};
use relay_domain::PromptTemplate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// First message of every prompt
    pub system_prompt: String,
    /// Stored in place of image payloads
    pub image_marker: String,
    /// "keep", "rollback" or "mark_unanswered"
    pub failed_turn_policy: FailedTurnPolicy,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: PromptTemplate::default_system().to_string(),
            image_marker: PromptTemplate::DEFAULT_IMAGE_MARKER.to_string(),
            failed_turn_policy: FailedTurnPolicy::default(),
        }
    }
}

impl FileChatConfig {
    pub fn to_chat_params(&self) -> ChatParams {
        ChatParams::default()
            .with_system_prompt(&self.system_prompt)
            .with_image_marker(&self.image_marker)
            .with_failed_turn_policy(self.failed_turn_policy)
    }
}
