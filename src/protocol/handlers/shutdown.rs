//! Shutdown command.
//!
//! `GET` on a path whose terminal token is `shutdown` acknowledges with a
//! fixed HTML page, closes the sink, then signals the lifecycle coordinator
//! so the serve loop drains and exits after the response flushes.

use std::sync::Arc;

use axum::http::{Method, StatusCode};

use crate::http::request::IncomingRequest;
use crate::http::sink::ResponseSink;
use crate::lifecycle::Shutdown;
use crate::protocol::errors::ProtocolError;
use crate::protocol::handler::{base_validate, Handler};

/// Body acknowledged to the client before the server begins draining.
pub const SHUTDOWN_BODY: &str = "<html><body>Closing...</body></html>";

pub struct ShutdownHandler {
    shutdown: Arc<Shutdown>,
}

impl ShutdownHandler {
    pub fn new(shutdown: Arc<Shutdown>) -> Self {
        Self { shutdown }
    }
}

impl Handler for ShutdownHandler {
    fn handle(
        &self,
        req: &IncomingRequest,
        sink: &mut ResponseSink,
    ) -> Result<(), ProtocolError> {
        base_validate(req)?;

        if *req.method() == Method::GET && req.url().file.as_deref() == Some("shutdown") {
            sink.set_status(StatusCode::OK)?;
            sink.set_header("Content-Type", "text/html;charset=UTF-8")?;
            sink.write(SHUTDOWN_BODY.as_bytes())?;
            sink.close()?;

            tracing::info!("shutdown command received, draining");
            self.shutdown.trigger();
            return Ok(());
        }

        Err(ProtocolError::invalid_command_method(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{header, HeaderMap};

    fn handler() -> (ShutdownHandler, Arc<Shutdown>) {
        let shutdown = Arc::new(Shutdown::new());
        (ShutdownHandler::new(shutdown.clone()), shutdown)
    }

    fn request(method: Method, path: &str) -> IncomingRequest {
        IncomingRequest::new(method, path, HeaderMap::new(), Bytes::new())
    }

    #[test]
    fn get_shutdown_writes_fixed_html_and_signals() {
        let (handler, shutdown) = handler();
        let mut rx = shutdown.subscribe();
        let mut sink = ResponseSink::new();

        handler
            .handle(&request(Method::GET, "/session/abc/shutdown"), &mut sink)
            .unwrap();

        assert!(sink.is_closed());
        assert_eq!(sink.status(), StatusCode::OK);
        assert_eq!(
            sink.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html;charset=UTF-8"
        );
        assert_eq!(sink.headers().get(header::CONTENT_LENGTH).unwrap(), "36");
        assert_eq!(sink.body(), SHUTDOWN_BODY.as_bytes());

        rx.try_recv().expect("shutdown signal was broadcast");
    }

    #[test]
    fn content_length_matches_actual_body() {
        let (handler, _shutdown) = handler();
        let mut sink = ResponseSink::new();
        handler
            .handle(&request(Method::GET, "/shutdown"), &mut sink)
            .unwrap();

        let declared: usize = sink
            .headers()
            .get(header::CONTENT_LENGTH)
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(declared, sink.body().len());
    }

    #[test]
    fn wrong_method_is_invalid_command_method() {
        let (handler, shutdown) = handler();
        let mut rx = shutdown.subscribe();
        let mut sink = ResponseSink::new();

        let err = handler
            .handle(&request(Method::POST, "/session/abc/shutdown"), &mut sink)
            .unwrap_err();

        assert!(matches!(err, ProtocolError::InvalidCommandMethod { .. }));
        assert!(!sink.is_closed());
        assert!(rx.try_recv().is_err(), "no shutdown signal on mismatch");
    }

    #[test]
    fn wrong_file_token_is_invalid_command_method() {
        let (handler, _shutdown) = handler();
        let mut sink = ResponseSink::new();

        let err = handler
            .handle(&request(Method::GET, "/session/abc/other"), &mut sink)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidCommandMethod { .. }));
    }
}
