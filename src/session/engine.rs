//! Automation engine boundary.
//!
//! The dispatch core never talks to a browser directly. Leaf handlers call
//! this trait; the crate ships an in-memory [`SessionRegistry`] behind it,
//! and a real browser backend would implement the same contract.
//!
//! [`SessionRegistry`]: crate::session::registry::SessionRegistry

use crate::protocol::errors::ProtocolError;

/// Capability invoked by command handlers to drive browser sessions.
///
/// Calls are opaque to the dispatcher: they may block or suspend per the
/// implementor's own contract, and failures surface as `ProtocolError` like
/// any other expected protocol failure.
pub trait AutomationEngine: Send + Sync {
    /// Start a session for the given desired capabilities, returning its id.
    fn create_session(&self, capabilities: serde_json::Value) -> Result<String, ProtocolError>;

    /// Capabilities the session was created with.
    fn capabilities(&self, session_id: &str) -> Result<serde_json::Value, ProtocolError>;

    /// Navigate the session to a URL.
    fn navigate(&self, session_id: &str, url: &str) -> Result<(), ProtocolError>;

    /// URL the session is currently on.
    fn current_url(&self, session_id: &str) -> Result<String, ProtocolError>;

    /// Title of the current page.
    fn title(&self, session_id: &str) -> Result<String, ProtocolError>;

    /// End the session and release its resources.
    fn delete_session(&self, session_id: &str) -> Result<(), ProtocolError>;

    /// Ids of all live sessions.
    fn active_sessions(&self) -> Vec<String>;
}
