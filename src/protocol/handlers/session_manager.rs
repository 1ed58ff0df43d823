//! Session manager commands.
//!
//! `POST /session` starts a session through the automation engine;
//! `GET /sessions` lists the ids of all live sessions.

use std::sync::Arc;

use axum::http::Method;
use serde_json::json;

use crate::http::request::IncomingRequest;
use crate::http::sink::ResponseSink;
use crate::protocol::errors::ProtocolError;
use crate::protocol::handler::{base_validate, write_success, Handler};
use crate::session::AutomationEngine;

pub struct SessionManagerHandler {
    engine: Arc<dyn AutomationEngine>,
}

impl SessionManagerHandler {
    pub fn new(engine: Arc<dyn AutomationEngine>) -> Self {
        Self { engine }
    }

    fn create_session(
        &self,
        req: &IncomingRequest,
        sink: &mut ResponseSink,
    ) -> Result<(), ProtocolError> {
        let payload = req.json_body()?;
        // Desired capabilities live under "capabilities" (W3C) or
        // "desiredCapabilities" (legacy); an absent payload means none.
        let capabilities = payload
            .get("capabilities")
            .or_else(|| payload.get("desiredCapabilities"))
            .cloned()
            .unwrap_or_else(|| json!({}));

        let session_id = self.engine.create_session(capabilities.clone())?;
        write_success(
            sink,
            json!({
                "sessionId": session_id,
                "capabilities": capabilities,
            }),
        )
    }

    fn list_sessions(&self, sink: &mut ResponseSink) -> Result<(), ProtocolError> {
        let ids: Vec<serde_json::Value> = self
            .engine
            .active_sessions()
            .into_iter()
            .map(|id| json!({ "id": id }))
            .collect();
        write_success(sink, json!(ids))
    }
}

impl Handler for SessionManagerHandler {
    fn handle(
        &self,
        req: &IncomingRequest,
        sink: &mut ResponseSink,
    ) -> Result<(), ProtocolError> {
        base_validate(req)?;

        let resource = req.url().resource_slice();
        if *req.method() == Method::POST && resource == ["session"] {
            self.create_session(req, sink)
        } else if *req.method() == Method::GET && resource == ["sessions"] {
            self.list_sessions(sink)
        } else {
            Err(ProtocolError::invalid_command_method(req))
        }
    }
}
