//! Status command.
//!
//! `GET /status` reports readiness plus build and host metadata.

use axum::http::Method;
use serde_json::json;

use crate::http::request::IncomingRequest;
use crate::http::sink::ResponseSink;
use crate::protocol::errors::ProtocolError;
use crate::protocol::handler::{base_validate, write_success, Handler};

pub struct StatusHandler;

impl StatusHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StatusHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for StatusHandler {
    fn handle(
        &self,
        req: &IncomingRequest,
        sink: &mut ResponseSink,
    ) -> Result<(), ProtocolError> {
        base_validate(req)?;

        if *req.method() == Method::GET && req.url().resource_slice() == ["status"] {
            return write_success(
                sink,
                json!({
                    "ready": true,
                    "message": "wraithdriver ready for new sessions",
                    "build": {
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                    "os": {
                        "name": std::env::consts::OS,
                        "arch": std::env::consts::ARCH,
                    },
                }),
            );
        }

        Err(ProtocolError::invalid_command_method(req))
    }
}
