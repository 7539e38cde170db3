//! Manage Session use case.
//!
//! Creates sessions and returns snapshots of existing ones.

use relay_domain::{Session, SessionStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when looking up a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
}

/// Use case for session lifecycle requests.
pub struct ManageSessionUseCase {
    store: Arc<dyn SessionStore>,
}

impl ManageSessionUseCase {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Register a new, empty session.
    pub fn create(&self) -> Session {
        let session = self.store.create_session();
        info!(session_id = %session.id(), "Session created");
        session
    }

    /// Snapshot of an existing session.
    pub fn get(&self, id: &str) -> Result<Session, SessionError> {
        let session = self
            .store
            .get_session(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        debug!(session_id = %id, messages = session.len(), "Session fetched");
        Ok(session)
    }

    pub fn session_count(&self) -> usize {
        self.store.session_count()
    }
}
