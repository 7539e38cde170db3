//! Prompt assembly
//!
//! Builds the ordered message list for one chat turn:
//!
//! 1. system prompt
//! 2. numbered context snippets (only when there are any)
//! 3. session history, unmodified
//! 4. the new user turn (text or multimodal)

use super::template::PromptTemplate;
use crate::session::content::{ContentItem, MessageContent, PromptMessage};
use crate::session::entities::Message;

/// The new user turn appended at the end of the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserTurn {
    Text(String),
    Multimodal(Vec<ContentItem>),
}

impl From<UserTurn> for MessageContent {
    fn from(turn: UserTurn) -> Self {
        match turn {
            UserTurn::Text(text) => MessageContent::Text(text),
            UserTurn::Multimodal(items) => MessageContent::Multimodal(items),
        }
    }
}

/// Pure builder of provider prompts
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_prompt: String,
}

impl PromptAssembler {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// Assemble the message list for one turn.
    ///
    /// `history` must not contain `turn` itself.
    pub fn assemble(
        &self,
        history: &[Message],
        context: &[String],
        turn: UserTurn,
    ) -> Vec<PromptMessage> {
        let mut messages = Vec::with_capacity(history.len() + 3);

        messages.push(PromptMessage::system(self.system_prompt.as_str()));

        if let Some(block) = PromptTemplate::context_block(context) {
            messages.push(PromptMessage::user(block));
        }

        messages.extend(
            history
                .iter()
                .map(|m| PromptMessage::new(m.role, m.content.as_str())),
        );

        messages.push(PromptMessage::user(turn));

        messages
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(PromptTemplate::default_system())
    }
}
