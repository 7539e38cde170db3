//! Chat use case.
//!
//! Runs one chat turn end to end:
//!
//! 1. Validate the input and look up the session
//! 2. Record the user turn (image payloads flattened to a marker)
//! 3. Assemble the prompt from the history snapshot taken *before* step 2
//! 4. Call the [`CompletionProvider`] (bounded by timeout / cancellation)
//! 5. Record the assistant reply
//!
//! A failed provider call never appends an assistant message; the recorded
//! user turn is handled according to [`FailedTurnPolicy`].

use crate::config::{ChatParams, FailedTurnPolicy};
use crate::ports::completion_provider::{CompletionProvider, ProviderError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use relay_domain::util::preview;
use relay_domain::{
    ContentItem, DomainError, Message, PromptAssembler, PromptMessage, PromptTemplate, Role,
    SessionStore, UserTurn,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a chat turn.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ChatError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatError::Cancelled)
    }
}

/// Input for the [`ChatUseCase`].
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Session the turn belongs to.
    pub session_id: String,
    /// The user's question; also the text stored for multimodal turns.
    pub query: String,
    /// Context snippets numbered into a single context message.
    pub context: Vec<String>,
    /// Multimodal content; when non-empty it replaces `query` in the prompt.
    pub content: Option<Vec<ContentItem>>,
}

impl ChatInput {
    pub fn new(session_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            query: query.into(),
            context: Vec::new(),
            content: None,
        }
    }

    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    pub fn with_content(mut self, content: Vec<ContentItem>) -> Self {
        self.content = Some(content);
        self
    }

    /// Whether this turn carries multimodal content
    pub fn is_multimodal(&self) -> bool {
        self.content.as_ref().is_some_and(|items| !items.is_empty())
    }

    /// Check the turn before it touches any session.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.is_multimodal() && self.query.trim().is_empty() {
            return Err(DomainError::EmptyTurn);
        }
        if let Some(items) = &self.content {
            for item in items {
                item.validate()?;
            }
        }
        Ok(())
    }
}

/// Result of a successful chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutput {
    pub session_id: String,
    pub reply: String,
}

/// Use case for running a chat turn against a session.
pub struct ChatUseCase {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn CompletionProvider>,
    assembler: PromptAssembler,
    params: ChatParams,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl ChatUseCase {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn CompletionProvider>,
        params: ChatParams,
    ) -> Self {
        Self {
            store,
            provider,
            assembler: PromptAssembler::new(params.system_prompt.clone()),
            params,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token that aborts pending provider calls
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute one chat turn.
    pub async fn execute(&self, input: ChatInput) -> Result<ChatOutput, ChatError> {
        input.validate()?;
        let multimodal = input.is_multimodal();

        let ChatInput {
            session_id,
            query,
            context,
            content,
        } = input;

        // Snapshot taken before the user turn is recorded, so the turn is not
        // duplicated in the history part of the prompt.
        let session = self
            .store
            .get_session(&session_id)
            .ok_or_else(|| ChatError::SessionNotFound(session_id.clone()))?;

        let (stored_text, turn) = match content {
            Some(items) if multimodal => (
                PromptTemplate::flattened_image_turn(&query, &self.params.image_marker),
                UserTurn::Multimodal(items),
            ),
            _ => (query.clone(), UserTurn::Text(query)),
        };

        info!(
            session_id = %session_id,
            history = session.len(),
            context = context.len(),
            multimodal,
            "Chat turn: {}",
            preview(&stored_text, 100)
        );

        let user_message = self
            .store
            .append_message(&session_id, Role::User, stored_text)
            .ok_or_else(|| ChatError::SessionNotFound(session_id.clone()))?;

        let prompt = self.assembler.assemble(session.messages(), &context, turn);

        self.conversation_logger.log(ConversationEvent::chat_request(
            &session_id,
            self.provider.name(),
            prompt.len(),
            context.len(),
            multimodal,
            &user_message.content,
        ));

        let reply = match self.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Chat turn failed");
                self.handle_failed_turn(&session_id, &user_message);
                self.conversation_logger.log(ConversationEvent::chat_failed(
                    &session_id,
                    &e.to_string(),
                    self.params.failed_turn_policy.as_str(),
                ));
                return Err(e);
            }
        };

        self.store
            .append_message(&session_id, Role::Assistant, reply.clone())
            .ok_or_else(|| ChatError::SessionNotFound(session_id.clone()))?;

        debug!(session_id = %session_id, bytes = reply.len(), "Reply recorded");

        self.conversation_logger.log(ConversationEvent::chat_response(
            &session_id,
            self.provider.name(),
            &reply,
        ));

        Ok(ChatOutput { session_id, reply })
    }

    /// Call the provider, bounded by the configured timeout and cancellation token.
    async fn complete(&self, prompt: &[PromptMessage]) -> Result<String, ChatError> {
        let call = async {
            match self.params.provider_timeout {
                Some(limit) => {
                    match tokio::time::timeout(limit, self.provider.complete(prompt)).await {
                        Ok(result) => result,
                        Err(_) => Err(ProviderError::Timeout(limit)),
                    }
                }
                None => self.provider.complete(prompt).await,
            }
        };

        let result = if let Some(ref token) = self.cancellation_token {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ChatError::Cancelled),
                result = call => result,
            }
        } else {
            call.await
        };

        result.map_err(ChatError::Provider)
    }

    fn handle_failed_turn(&self, session_id: &str, user_message: &Message) {
        match self.params.failed_turn_policy {
            FailedTurnPolicy::Keep => {}
            FailedTurnPolicy::Rollback => {
                if !self.store.retract_message(session_id, &user_message.id) {
                    warn!(session_id, "Could not roll back unanswered user turn");
                }
            }
            FailedTurnPolicy::MarkUnanswered => {
                if !self.store.mark_unanswered(session_id, &user_message.id) {
                    warn!(session_id, "Could not mark user turn as unanswered");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_domain::{MessageContent, Session};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct MockStore {
        sessions: Mutex<HashMap<String, Session>>,
    }

    impl MockStore {
        fn with_session(&self, mutate: impl FnOnce(&mut Session)) -> String {
            let mut session = Session::new();
            mutate(&mut session);
            let id = session.id().to_string();
            self.sessions.lock().unwrap().insert(id.clone(), session);
            id
        }

        fn messages(&self, id: &str) -> Vec<Message> {
            self.sessions.lock().unwrap()[id].messages().to_vec()
        }
    }

    impl SessionStore for MockStore {
        fn create_session(&self) -> Session {
            let session = Session::new();
            self.sessions
                .lock()
                .unwrap()
                .insert(session.id().to_string(), session.clone());
            session
        }

        fn get_session(&self, id: &str) -> Option<Session> {
            self.sessions.lock().unwrap().get(id).cloned()
        }

        fn append_message(&self, session_id: &str, role: Role, content: String) -> Option<Message> {
            self.sessions
                .lock()
                .unwrap()
                .get_mut(session_id)
                .map(|s| s.push_message(role, content))
        }

        fn retract_message(&self, session_id: &str, message_id: &str) -> bool {
            self.sessions
                .lock()
                .unwrap()
                .get_mut(session_id)
                .is_some_and(|s| s.remove_message(message_id))
        }

        fn mark_unanswered(&self, session_id: &str, message_id: &str) -> bool {
            self.sessions
                .lock()
                .unwrap()
                .get_mut(session_id)
                .is_some_and(|s| s.mark_unanswered(message_id))
        }

        fn session_count(&self) -> usize {
            self.sessions.lock().unwrap().len()
        }
    }

    /// Replies with a fixed text and records every prompt it receives.
    struct MockProvider {
        reply: Result<String, &'static str>,
        delay: Option<Duration>,
        prompts: Mutex<Vec<Vec<PromptMessage>>>,
    }

    impl MockProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                delay: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err("upstream exploded"),
                delay: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                reply: Ok("too late".to_string()),
                delay: Some(delay),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn last_prompt(&self) -> Vec<PromptMessage> {
            self.prompts.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(messages.to_vec());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status_body) => Err(ProviderError::Status {
                    status: 500,
                    body: status_body.to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<ConversationEvent>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl RecordingLogger {
        fn event_types(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().iter().map(|e| e.event_type).collect()
        }
    }

    fn use_case(
        store: &Arc<MockStore>,
        provider: &Arc<MockProvider>,
        params: ChatParams,
    ) -> ChatUseCase {
        ChatUseCase::new(store.clone(), provider.clone(), params)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_text_turn_records_user_and_assistant() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::replying("Hi there"));
        let id = store.with_session(|_| {});

        let output = use_case(&store, &provider, ChatParams::default())
            .execute(ChatInput::new(&id, "Hello"))
            .await
            .unwrap();

        assert_eq!(output.reply, "Hi there");
        assert_eq!(output.session_id, id);

        let messages = store.messages(&id);
        assert_eq!(messages.len(), 2);
        assert_eq!((messages[0].role, messages[0].content.as_str()), (Role::User, "Hello"));
        assert_eq!(
            (messages[1].role, messages[1].content.as_str()),
            (Role::Assistant, "Hi there")
        );
    }

    #[tokio::test]
    async fn test_transcript_events_for_answered_and_failed_turns() {
        let store = Arc::new(MockStore::default());
        let id = store.with_session(|_| {});
        let logger = Arc::new(RecordingLogger::default());

        let answered = use_case(&store, &Arc::new(MockProvider::replying("Hi")), ChatParams::default())
            .with_conversation_logger(logger.clone());
        answered.execute(ChatInput::new(&id, "Hello")).await.unwrap();

        let failing = use_case(
            &store,
            &Arc::new(MockProvider::failing()),
            ChatParams::default().with_failed_turn_policy(FailedTurnPolicy::Rollback),
        )
        .with_conversation_logger(logger.clone());
        failing.execute(ChatInput::new(&id, "Again")).await.unwrap_err();

        assert_eq!(
            logger.event_types(),
            vec!["chat_request", "chat_response", "chat_request", "chat_failed"]
        );
        let events = logger.events.lock().unwrap();
        assert_eq!(events[0].payload["text"], "Hello");
        assert_eq!(events[0].payload["provider"], "mock");
        assert_eq!(events[1].payload["text"], "Hi");
        assert_eq!(events[3].payload["policy"], "rollback");
        assert_eq!(events[3].payload["session_id"], id.as_str());
    }

    #[tokio::test]
    async fn test_prompt_uses_history_before_the_new_turn() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::replying("ok"));
        let id = store.with_session(|s| {
            s.push_message(Role::User, "earlier question");
            s.push_message(Role::Assistant, "earlier answer");
        });

        use_case(&store, &provider, ChatParams::default().with_system_prompt("sys"))
            .execute(ChatInput::new(&id, "new question").with_context(vec!["doc".into()]))
            .await
            .unwrap();

        let prompt = provider.last_prompt();
        assert_eq!(prompt.len(), 5);
        assert_eq!(prompt[0], PromptMessage::system("sys"));
        assert_eq!(prompt[1], PromptMessage::user("Context information:\n\n[1] doc\n\n"));
        assert_eq!(prompt[2], PromptMessage::user("earlier question"));
        assert_eq!(prompt[3], PromptMessage::assistant("earlier answer"));
        assert_eq!(prompt[4], PromptMessage::user("new question"));
        let new_turns = prompt
            .iter()
            .filter(|m| m.content.as_text() == Some("new question"))
            .count();
        assert_eq!(new_turns, 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_rejected_without_side_effects() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::replying("unused"));

        let result = use_case(&store, &provider, ChatParams::default())
            .execute(ChatInput::new("no-such-session", "Hello"))
            .await;

        assert!(matches!(result, Err(ChatError::SessionNotFound(id)) if id == "no-such-session"));
        assert_eq!(store.session_count(), 0);
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_multimodal_turn_stores_marker_and_sends_items() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::replying("A cat."));
        let id = store.with_session(|_| {});
        let items = vec![
            ContentItem::text("What is this?"),
            ContentItem::image_url("data:image/jpeg;base64,AAAA"),
        ];

        use_case(&store, &provider, ChatParams::default())
            .execute(ChatInput::new(&id, "What is this?").with_content(items.clone()))
            .await
            .unwrap();

        let messages = store.messages(&id);
        assert_eq!(messages[0].content, "What is this? [with image]");
        assert!(!messages[0].content.contains("base64"));

        let prompt = provider.last_prompt();
        assert_eq!(
            prompt.last().map(|m| &m.content),
            Some(&MessageContent::Multimodal(items))
        );
    }

    #[tokio::test]
    async fn test_empty_content_list_is_a_text_turn() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::replying("ok"));
        let id = store.with_session(|_| {});

        use_case(&store, &provider, ChatParams::default())
            .execute(ChatInput::new(&id, "plain").with_content(vec![]))
            .await
            .unwrap();

        assert_eq!(store.messages(&id)[0].content, "plain");
        assert_eq!(
            provider.last_prompt().last().unwrap().content,
            MessageContent::Text("plain".into())
        );
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_user_turn_by_default() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::failing());
        let id = store.with_session(|s| {
            s.push_message(Role::User, "before");
        });

        let result = use_case(&store, &provider, ChatParams::default())
            .execute(ChatInput::new(&id, "Hello"))
            .await;

        assert!(matches!(result, Err(ChatError::Provider(ProviderError::Status { .. }))));
        let messages = store.messages(&id);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::User);
        assert!(!messages[1].unanswered);
    }

    #[tokio::test]
    async fn test_provider_failure_with_rollback_policy() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::failing());
        let id = store.with_session(|s| {
            s.push_message(Role::User, "before");
        });
        let params = ChatParams::default().with_failed_turn_policy(FailedTurnPolicy::Rollback);

        let result = use_case(&store, &provider, params)
            .execute(ChatInput::new(&id, "Hello"))
            .await;

        assert!(result.is_err());
        let messages = store.messages(&id);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "before");
    }

    #[tokio::test]
    async fn test_provider_failure_with_mark_policy() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::failing());
        let id = store.with_session(|_| {});
        let params =
            ChatParams::default().with_failed_turn_policy(FailedTurnPolicy::MarkUnanswered);

        let _ = use_case(&store, &provider, params)
            .execute(ChatInput::new(&id, "Hello"))
            .await;

        let messages = store.messages(&id);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].unanswered);
    }

    #[tokio::test]
    async fn test_provider_timeout() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::slow(Duration::from_secs(5)));
        let id = store.with_session(|_| {});
        let params =
            ChatParams::default().with_provider_timeout(Some(Duration::from_millis(20)));

        let result = use_case(&store, &provider, params)
            .execute(ChatInput::new(&id, "Hello"))
            .await;

        match result {
            Err(ChatError::Provider(e)) => assert!(e.is_timeout()),
            other => panic!("Expected timeout, got {:?}", other),
        }
        assert_eq!(store.messages(&id).len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_turn_leaves_user_turn() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::slow(Duration::from_secs(5)));
        let id = store.with_session(|_| {});
        let token = CancellationToken::new();
        token.cancel();

        let result = use_case(&store, &provider, ChatParams::default())
            .with_cancellation(token)
            .execute(ChatInput::new(&id, "Hello"))
            .await;

        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(store.messages(&id).len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_never_touches_the_store() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::replying("unused"));
        let id = store.with_session(|_| {});
        let chat = use_case(&store, &provider, ChatParams::default());

        let blank = chat.execute(ChatInput::new(&id, "   ")).await;
        assert!(matches!(
            blank,
            Err(ChatError::InvalidRequest(DomainError::EmptyTurn))
        ));

        let bad_image = chat
            .execute(ChatInput::new(&id, "look").with_content(vec![ContentItem::image_url("")]))
            .await;
        assert!(matches!(
            bad_image,
            Err(ChatError::InvalidRequest(DomainError::InvalidContentItem(_)))
        ));

        assert!(store.messages(&id).is_empty());
    }

    #[tokio::test]
    async fn test_image_only_turn_with_blank_query_is_accepted() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::replying("a picture"));
        let id = store.with_session(|_| {});

        use_case(&store, &provider, ChatParams::default())
            .execute(
                ChatInput::new(&id, "")
                    .with_content(vec![ContentItem::image_url("http://img/1.png")]),
            )
            .await
            .unwrap();

        assert!(store.messages(&id)[0].content.ends_with("[with image]"));
    }

    #[tokio::test]
    async fn test_concurrent_turns_on_one_session_all_land() {
        let store = Arc::new(MockStore::default());
        let provider = Arc::new(MockProvider::replying("ok"));
        let id = store.with_session(|_| {});
        let chat = Arc::new(use_case(&store, &provider, ChatParams::default()));

        let turns = (0..10).map(|i| {
            let chat = chat.clone();
            let id = id.clone();
            async move { chat.execute(ChatInput::new(id, format!("q{}", i))).await }
        });
        let results = futures::future::join_all(turns).await;

        assert!(results.iter().all(|r| r.is_ok()));
        let messages = store.messages(&id);
        assert_eq!(messages.len(), 20);
        assert_eq!(
            messages.iter().filter(|m| m.role == Role::User).count(),
            10
        );
    }
}
