//! Prompt templates for chat turns

/// Templates for the fixed pieces of a chat prompt
pub struct PromptTemplate;

impl PromptTemplate {
    /// Header that opens the context message
    pub const CONTEXT_HEADER: &'static str = "Context information:\n\n";

    /// Suffix stored in place of image payloads
    pub const DEFAULT_IMAGE_MARKER: &'static str = "[with image]";

    /// Default system prompt for the relay
    pub fn default_system() -> &'static str {
        "You are a helpful assistant. Use the provided context to answer questions accurately."
    }

    /// Number context snippets into a single block.
    ///
    /// Returns `None` for an empty slice so no placeholder message is emitted.
    pub fn context_block(snippets: &[String]) -> Option<String> {
        if snippets.is_empty() {
            return None;
        }

        let mut block = String::from(Self::CONTEXT_HEADER);
        for (i, snippet) in snippets.iter().enumerate() {
            block.push_str(&format!("[{}] {}\n\n", i + 1, snippet));
        }
        Some(block)
    }

    /// Text persisted for a user turn that carried images
    pub fn flattened_image_turn(query: &str, marker: &str) -> String {
        format!("{} {}", query, marker)
    }
}
