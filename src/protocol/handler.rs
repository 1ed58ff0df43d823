//! Handler contract and shared preconditions.
//!
//! # Responsibilities
//! - Define the `Handler` trait every command implements
//! - Provide the shared `base_validate` precondition
//! - Provide the JSON response helpers all handlers emit through
//!
//! # Design Decisions
//! - Explicit super-call discipline: every concrete `handle` calls
//!   `base_validate(req)?` as its first statement. Composition over a
//!   virtual-dispatch chain keeps the ordering visible at the call site.
//! - Terminal states are mutually exclusive: a handler either writes and
//!   closes the sink, or returns a `ProtocolError`, never both.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::http::request::IncomingRequest;
use crate::http::sink::ResponseSink;
use crate::protocol::errors::ProtocolError;

/// The unit implementing one protocol command.
pub trait Handler: Send + Sync {
    /// Execute the command, writing a complete response to the sink or
    /// returning a typed protocol error. Never both.
    fn handle(&self, req: &IncomingRequest, sink: &mut ResponseSink)
        -> Result<(), ProtocolError>;
}

/// Shared validation every concrete handler runs before its own logic.
///
/// Commands that carry a body (POST/PUT with a non-empty payload) must
/// declare a JSON content type and the payload must parse as a JSON object.
pub fn base_validate(req: &IncomingRequest) -> Result<(), ProtocolError> {
    let has_body = !req.body().is_empty();
    let bodied_method = *req.method() == Method::POST || *req.method() == Method::PUT;
    if !(has_body && bodied_method) {
        return Ok(());
    }

    match req.content_type() {
        Some(ct) if ct.to_ascii_lowercase().starts_with("application/json") => {}
        other => {
            return Err(ProtocolError::invalid_argument(format!(
                "expected application/json content type, got {}",
                other.unwrap_or("none")
            )));
        }
    }

    let payload = req.json_body()?;
    if !payload.is_object() {
        return Err(ProtocolError::invalid_argument(
            "command payload must be a JSON object",
        ));
    }
    Ok(())
}

/// Write a JSON document and close the sink.
pub fn write_json(
    sink: &mut ResponseSink,
    status: StatusCode,
    value: &serde_json::Value,
) -> Result<(), ProtocolError> {
    sink.set_status(status)?;
    sink.set_header("Content-Type", "application/json; charset=utf-8")?;
    sink.write(value.to_string().as_bytes())?;
    sink.close()?;
    Ok(())
}

/// Write the standard WebDriver success envelope `{"value": ...}` with 200.
pub fn write_success(
    sink: &mut ResponseSink,
    value: serde_json::Value,
) -> Result<(), ProtocolError> {
    write_json(sink, StatusCode::OK, &json!({ "value": value }))
}
