//! Message content value objects
//!
//! A prompt message carries either plain text or an ordered list of
//! multimodal [`ContentItem`]s. Multimodal content only exists while a
//! prompt is being assembled; sessions store plain text.

use crate::core::error::DomainError;
use crate::session::entities::Role;
use serde::{Deserialize, Serialize};

/// Reference to image data (a URL or a `data:` URI)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ImageUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            detail: None,
        }
    }
}

/// One part of a multimodal message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        ContentItem::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentItem::ImageUrl {
            image_url: ImageUrl::new(url),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ContentItem::ImageUrl { .. })
    }

    /// Check that the item is usable in a prompt.
    ///
    /// Text parts may be empty; image parts need a non-blank URL.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            ContentItem::Text { .. } => Ok(()),
            ContentItem::ImageUrl { image_url } if image_url.url.trim().is_empty() => Err(
                DomainError::InvalidContentItem("image_url requires a url".to_string()),
            ),
            ContentItem::ImageUrl { .. } => Ok(()),
        }
    }
}

/// Content of a prompt message: plain text or a multimodal list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Multimodal(Vec<ContentItem>),
}

impl MessageContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Multimodal(_) => None,
        }
    }

    pub fn as_items(&self) -> Option<&[ContentItem]> {
        match self {
            MessageContent::Text(_) => None,
            MessageContent::Multimodal(items) => Some(items),
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<Vec<ContentItem>> for MessageContent {
    fn from(items: Vec<ContentItem>) -> Self {
        MessageContent::Multimodal(items)
    }
}

/// A message as sent to the completion provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl PromptMessage {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
