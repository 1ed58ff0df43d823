//! In-memory session registry.
//!
//! # Responsibilities
//! - Track live sessions and their per-session page state
//! - Implement [`AutomationEngine`] without a real browser behind it
//!
//! # Design Decisions
//! - Concurrent map keyed by session id; per-request tasks read and write
//!   without an outer lock
//! - Session ids are UUID v4, opaque to clients

use dashmap::DashMap;
use uuid::Uuid;

use crate::protocol::errors::ProtocolError;
use crate::session::engine::AutomationEngine;

/// Per-session page state.
#[derive(Debug, Clone)]
struct SessionState {
    capabilities: serde_json::Value,
    current_url: String,
    title: String,
}

/// Concurrent table of live sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionState>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl AutomationEngine for SessionRegistry {
    fn create_session(&self, capabilities: serde_json::Value) -> Result<String, ProtocolError> {
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(
            id.clone(),
            SessionState {
                capabilities,
                current_url: "about:blank".to_string(),
                title: String::new(),
            },
        );
        tracing::info!(session_id = %id, "session created");
        Ok(id)
    }

    fn capabilities(&self, session_id: &str) -> Result<serde_json::Value, ProtocolError> {
        self.sessions
            .get(session_id)
            .map(|s| s.capabilities.clone())
            .ok_or_else(|| ProtocolError::unknown_session(session_id))
    }

    fn navigate(&self, session_id: &str, url: &str) -> Result<(), ProtocolError> {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| ProtocolError::unknown_session(session_id))?;
        session.current_url = url.to_string();
        tracing::debug!(session_id = %session_id, url = %url, "navigated");
        Ok(())
    }

    fn current_url(&self, session_id: &str) -> Result<String, ProtocolError> {
        self.sessions
            .get(session_id)
            .map(|s| s.current_url.clone())
            .ok_or_else(|| ProtocolError::unknown_session(session_id))
    }

    fn title(&self, session_id: &str) -> Result<String, ProtocolError> {
        self.sessions
            .get(session_id)
            .map(|s| s.title.clone())
            .ok_or_else(|| ProtocolError::unknown_session(session_id))
    }

    fn delete_session(&self, session_id: &str) -> Result<(), ProtocolError> {
        match self.sessions.remove(session_id) {
            Some(_) => {
                tracing::info!(session_id = %session_id, "session deleted");
                Ok(())
            }
            None => Err(ProtocolError::unknown_session(session_id)),
        }
    }

    fn active_sessions(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}
