//! Per-session commands.
//!
//! Commands addressed to `/session/{id}`: capability lookup, deletion,
//! navigation, current URL and page title. All browser work goes through the
//! automation engine; unknown ids surface as `UnknownSession`.

use std::sync::Arc;

use axum::http::Method;
use serde_json::json;

use crate::http::request::IncomingRequest;
use crate::http::sink::ResponseSink;
use crate::protocol::errors::ProtocolError;
use crate::protocol::handler::{base_validate, write_success, Handler};
use crate::session::AutomationEngine;

pub struct SessionHandler {
    engine: Arc<dyn AutomationEngine>,
}

impl SessionHandler {
    pub fn new(engine: Arc<dyn AutomationEngine>) -> Self {
        Self { engine }
    }

    fn navigate(
        &self,
        req: &IncomingRequest,
        session_id: &str,
        sink: &mut ResponseSink,
    ) -> Result<(), ProtocolError> {
        let payload = req.json_body()?;
        let url = payload
            .get("url")
            .and_then(|u| u.as_str())
            .ok_or_else(|| ProtocolError::invalid_argument("missing \"url\" field"))?;

        self.engine.navigate(session_id, url)?;
        write_success(sink, serde_json::Value::Null)
    }
}

impl Handler for SessionHandler {
    fn handle(
        &self,
        req: &IncomingRequest,
        sink: &mut ResponseSink,
    ) -> Result<(), ProtocolError> {
        base_validate(req)?;

        let Some(session_id) = req.url().session_id.clone() else {
            return Err(ProtocolError::invalid_command_method(req));
        };

        let method = req.method();
        let resource = req.url().resource_slice();

        if *method == Method::GET && resource.is_empty() {
            let capabilities = self.engine.capabilities(&session_id)?;
            write_success(sink, capabilities)
        } else if *method == Method::DELETE && resource.is_empty() {
            self.engine.delete_session(&session_id)?;
            write_success(sink, serde_json::Value::Null)
        } else if *method == Method::POST && resource == ["url"] {
            self.navigate(req, &session_id, sink)
        } else if *method == Method::GET && resource == ["url"] {
            let url = self.engine.current_url(&session_id)?;
            write_success(sink, json!(url))
        } else if *method == Method::GET && resource == ["title"] {
            let title = self.engine.title(&session_id)?;
            write_success(sink, json!(title))
        } else {
            Err(ProtocolError::invalid_command_method(req))
        }
    }
}
