//! In-memory session store.
//!
//! All sessions live in one `HashMap` behind a `std::sync::RwLock`. The lock
//! is held only for the map operation itself and never across an `.await`,
//! so a blocking lock is fine inside async handlers. Readers get a snapshot
//! (`Session` clones share the message list until the next append).

use relay_domain::{Message, Role, Session, SessionStore};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, trace};

/// Process-local [`SessionStore`] backed by a `RwLock<HashMap>`.
///
/// Sessions are never evicted; they live until the process exits.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a session under the write lock.
    fn with_session_mut<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.get_mut(id).map(f)
    }
}

impl SessionStore for InMemorySessionStore {
    fn create_session(&self) -> Session {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        // A v4 collision is practically impossible; regenerate rather than overwrite.
        let mut session = Session::new();
        while sessions.contains_key(session.id()) {
            session = Session::new();
        }
        sessions.insert(session.id().to_string(), session.clone());
        debug!(session_id = %session.id(), total = sessions.len(), "Registered session");
        session
    }

    fn get_session(&self, id: &str) -> Option<Session> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(id).cloned()
    }

    fn append_message(&self, session_id: &str, role: Role, content: String) -> Option<Message> {
        let message = self.with_session_mut(session_id, |s| s.push_message(role, content));
        if message.is_none() {
            trace!(session_id, "Append to unknown session ignored");
        }
        message
    }

    fn retract_message(&self, session_id: &str, message_id: &str) -> bool {
        self.with_session_mut(session_id, |s| s.remove_message(message_id))
            .unwrap_or(false)
    }

    fn mark_unanswered(&self, session_id: &str, message_id: &str) -> bool {
        self.with_session_mut(session_id, |s| s.mark_unanswered(message_id))
            .unwrap_or(false)
    }

    fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}
