//! Typed protocol errors.
//!
//! # Responsibilities
//! - Define the closed set of expected protocol failures
//! - Map each kind to an HTTP status and a WebDriver wire code
//! - Render the uniform JSON error body
//!
//! # Design Decisions
//! - Handlers construct and return these; only the dispatcher's error
//!   boundary writes them to the sink
//! - The set is extended only by adding kinds, never by repurposing one
//! - `UnexpectedFailure` keeps internal detail out of the client body; the
//!   full message goes to the log instead

use axum::http::{Method, StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::http::request::IncomingRequest;

/// An expected protocol-level failure, distinct from an internal fault.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The route matched but the HTTP method (or exact request shape) did not.
    #[error("invalid command method: {method} {path}")]
    InvalidCommandMethod { method: Method, path: String },

    /// No registered route matches the path.
    #[error("unknown command: {path}")]
    UnknownCommand { path: String },

    /// The request names a session that does not exist.
    #[error("unknown session: {session_id}")]
    UnknownSession { session_id: String },

    /// The request payload is malformed or missing a required field.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Anything uncategorized. Surfaced to the client as a generic 500.
    #[error("unexpected failure: {message}")]
    UnexpectedFailure { message: String },
}

impl ProtocolError {
    /// Wrong method or malformed invocation on an otherwise-matched route,
    /// with the offending request attached for diagnostics.
    pub fn invalid_command_method(req: &IncomingRequest) -> Self {
        Self::InvalidCommandMethod {
            method: req.method().clone(),
            path: req.path().to_string(),
        }
    }

    /// No registration matched the request path.
    pub fn unknown_command(req: &IncomingRequest) -> Self {
        Self::UnknownCommand {
            path: req.path().to_string(),
        }
    }

    pub fn unknown_session(session_id: impl Into<String>) -> Self {
        Self::UnknownSession {
            session_id: session_id.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedFailure {
            message: message.into(),
        }
    }

    /// HTTP status emitted for this kind.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCommandMethod { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnknownCommand { .. } => StatusCode::NOT_FOUND,
            Self::UnknownSession { .. } => StatusCode::NOT_FOUND,
            Self::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Self::UnexpectedFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable WebDriver error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCommandMethod { .. } => "unknown method",
            Self::UnknownCommand { .. } => "unknown command",
            Self::UnknownSession { .. } => "invalid session id",
            Self::InvalidArgument { .. } => "invalid argument",
            Self::UnexpectedFailure { .. } => "unknown error",
        }
    }

    /// Message safe to put in the client-visible body.
    pub fn public_message(&self) -> String {
        match self {
            // Internal detail stays in the log.
            Self::UnexpectedFailure { .. } => "an unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }

    /// The uniform JSON error body written by the dispatcher.
    pub fn body(&self) -> serde_json::Value {
        json!({
            "value": {
                "error": self.code(),
                "message": self.public_message(),
                "stacktrace": "",
            }
        })
    }
}
