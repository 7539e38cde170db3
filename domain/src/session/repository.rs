//! Session store trait

use crate::session::entities::{Message, Role, Session};

/// Registry of conversation sessions
///
/// This is a domain-level abstraction; the in-memory implementation lives in
/// the infrastructure layer. The store exclusively owns every session: callers
/// receive snapshots and must mutate only through these operations.
///
/// Implementations must serialize writers. For a single session, the order in
/// which `append_message` calls win the store's lock is the order visible to
/// every later `get_session`.
///
/// A missing session is a normal outcome (`None` / `false`), not an error.
pub trait SessionStore: Send + Sync {
    /// Register a new empty session with a fresh unguessable id
    fn create_session(&self) -> Session;

    /// Snapshot of a session, or `None` if the id is unknown
    fn get_session(&self, id: &str) -> Option<Session>;

    /// Append a message stamped with the current time.
    ///
    /// Returns the stored message, or `None` if the session does not exist.
    fn append_message(&self, session_id: &str, role: Role, content: String) -> Option<Message>;

    /// Remove one message by id. Returns `false` if the session or message is unknown.
    fn retract_message(&self, session_id: &str, message_id: &str) -> bool;

    /// Flag one message as unanswered. Returns `false` if the session or message is unknown.
    fn mark_unanswered(&self, session_id: &str, message_id: &str) -> bool;

    /// Number of registered sessions
    fn session_count(&self) -> usize;
}
