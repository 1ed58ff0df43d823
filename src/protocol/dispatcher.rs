//! Command dispatch.
//!
//! # Responsibilities
//! - Own the immutable registration table
//! - Select the first registration whose matcher accepts the parsed path
//! - Invoke the handler inside the single error boundary
//! - Translate `ProtocolError` (and panics) into the uniform error response
//!
//! # Design Decisions
//! - Selection is structural (path shape) only; method validation belongs to
//!   handlers so a matched route can answer a precise 405
//! - Registrations are built once at startup and read concurrently without
//!   locking; first match wins, in registration order
//! - The boundary guarantees the sink is always left closed and well-formed:
//!   exactly one of "handled" or "errored" per request

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;

use crate::http::request::IncomingRequest;
use crate::http::sink::ResponseSink;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::protocol::errors::ProtocolError;
use crate::protocol::handler::Handler;
use crate::protocol::handlers::{
    SessionHandler, SessionManagerHandler, ShutdownHandler, StatusHandler,
};
use crate::protocol::matcher::{
    FileMatcher, RootCommandMatcher, RouteMatcher, SessionCommandMatcher,
};
use crate::session::AutomationEngine;

/// One route: a path-shape matcher, the methods the command answers, and the
/// handler instance. Constructed at startup, immutable thereafter.
pub struct HandlerRegistration {
    name: &'static str,
    matcher: Box<dyn RouteMatcher>,
    methods: Vec<Method>,
    handler: Box<dyn Handler>,
}

impl HandlerRegistration {
    pub fn new(
        name: &'static str,
        matcher: Box<dyn RouteMatcher>,
        methods: Vec<Method>,
        handler: Box<dyn Handler>,
    ) -> Self {
        Self {
            name,
            matcher,
            methods,
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Methods this command answers. Informational: enforcement is the
    /// handler's own exact-match rule.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}

/// Selects and invokes the matching handler for each incoming request.
pub struct Dispatcher {
    registrations: Vec<HandlerRegistration>,
}

impl Dispatcher {
    pub fn new(registrations: Vec<HandlerRegistration>) -> Self {
        Self { registrations }
    }

    /// The standard command table, in match order. Shutdown is registered
    /// first so its terminal token wins over the session-command shapes.
    pub fn with_default_handlers(
        engine: Arc<dyn AutomationEngine>,
        shutdown: Arc<Shutdown>,
    ) -> Self {
        Self::new(vec![
            HandlerRegistration::new(
                "shutdown",
                Box::new(FileMatcher::new("shutdown")),
                vec![Method::GET],
                Box::new(ShutdownHandler::new(shutdown)),
            ),
            HandlerRegistration::new(
                "status",
                Box::new(RootCommandMatcher::new(&["status"])),
                vec![Method::GET],
                Box::new(StatusHandler::new()),
            ),
            HandlerRegistration::new(
                "session-manager",
                Box::new(RootCommandMatcher::new(&["session", "sessions"])),
                vec![Method::POST, Method::GET],
                Box::new(SessionManagerHandler::new(engine.clone())),
            ),
            HandlerRegistration::new(
                "session",
                Box::new(SessionCommandMatcher::new(&[&[], &["url"], &["title"]])),
                vec![Method::GET, Method::POST, Method::DELETE],
                Box::new(SessionHandler::new(engine)),
            ),
        ])
    }

    /// Dispatch one request. The sink is always left closed.
    pub fn dispatch(&self, req: &IncomingRequest, sink: &mut ResponseSink) {
        let start = Instant::now();
        let method = req.method().to_string();

        let Some(registration) = self
            .registrations
            .iter()
            .find(|r| r.matcher.matches(req.url()))
        else {
            tracing::warn!(method = %req.method(), path = %req.path(), "no command matched");
            self.write_error(sink, &ProtocolError::unknown_command(req));
            metrics::record_dispatch(&method, sink.status().as_u16(), "none", start);
            return;
        };

        tracing::debug!(
            handler = registration.name,
            method = %req.method(),
            path = %req.path(),
            "dispatching command"
        );

        match catch_unwind(AssertUnwindSafe(|| registration.handler.handle(req, sink))) {
            Ok(Ok(())) => {
                if !sink.is_closed() {
                    // Contract violation: the handler claimed success but
                    // produced no response.
                    tracing::error!(handler = registration.name, "handler returned without closing the sink");
                    self.write_error(
                        sink,
                        &ProtocolError::unexpected("handler produced no response"),
                    );
                }
            }
            Ok(Err(err)) => {
                tracing::debug!(
                    handler = registration.name,
                    error = %err,
                    status = %err.status(),
                    "command failed"
                );
                self.write_error(sink, &err);
            }
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                tracing::error!(handler = registration.name, panic = %detail, "handler panicked");
                self.write_error(sink, &ProtocolError::unexpected(detail));
            }
        }

        metrics::record_dispatch(&method, sink.status().as_u16(), registration.name, start);
    }

    /// Write an error response for a request that never reached dispatch
    /// (e.g. an unreadable body). Uses the same translation as the boundary.
    pub fn reject(&self, sink: &mut ResponseSink, err: &ProtocolError) {
        self.write_error(sink, err);
    }

    /// Single translation point from `ProtocolError` to an HTTP response.
    ///
    /// A sink the handler already closed stands as-is (terminal states are
    /// mutually exclusive; double-writing would be worse than the defect).
    /// An open sink is replaced wholesale so error bodies are never appended
    /// to partial output.
    fn write_error(&self, sink: &mut ResponseSink, err: &ProtocolError) {
        if sink.is_closed() {
            tracing::error!(error = %err, "error raised after response was closed, dropping");
            return;
        }

        *sink = ResponseSink::new();
        let result = (|| {
            sink.set_status(err.status())?;
            sink.set_header("Content-Type", "application/json; charset=utf-8")?;
            sink.write(err.body().to_string().as_bytes())?;
            sink.close()
        })();
        if let Err(sink_err) = result {
            // The sink is freshly created, so this cannot happen in practice.
            tracing::error!(error = %sink_err, "failed to write error response");
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{header, HeaderMap, StatusCode};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn request(method: Method, path: &str) -> IncomingRequest {
        IncomingRequest::new(method, path, HeaderMap::new(), Bytes::new())
    }

    /// Matches everything; used to test selection order and error paths.
    #[derive(Debug)]
    struct MatchAll;
    impl RouteMatcher for MatchAll {
        fn matches(&self, _url: &crate::protocol::url::ParsedUrl) -> bool {
            true
        }
    }

    /// Matches nothing.
    #[derive(Debug)]
    struct MatchNone;
    impl RouteMatcher for MatchNone {
        fn matches(&self, _url: &crate::protocol::url::ParsedUrl) -> bool {
            false
        }
    }

    /// Fails the test if it is ever invoked.
    struct SentinelHandler {
        called: Arc<AtomicBool>,
    }
    impl Handler for SentinelHandler {
        fn handle(
            &self,
            _req: &IncomingRequest,
            _sink: &mut ResponseSink,
        ) -> Result<(), ProtocolError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct PanickingHandler;
    impl Handler for PanickingHandler {
        fn handle(
            &self,
            _req: &IncomingRequest,
            _sink: &mut ResponseSink,
        ) -> Result<(), ProtocolError> {
            panic!("handler exploded");
        }
    }

    struct NoResponseHandler;
    impl Handler for NoResponseHandler {
        fn handle(
            &self,
            _req: &IncomingRequest,
            _sink: &mut ResponseSink,
        ) -> Result<(), ProtocolError> {
            Ok(())
        }
    }

    /// Writes part of a body, then fails.
    struct PartialWriteHandler;
    impl Handler for PartialWriteHandler {
        fn handle(
            &self,
            _req: &IncomingRequest,
            sink: &mut ResponseSink,
        ) -> Result<(), ProtocolError> {
            sink.write(b"partial garbage")?;
            Err(ProtocolError::invalid_argument("went wrong midway"))
        }
    }

    fn registration(
        name: &'static str,
        matcher: Box<dyn RouteMatcher>,
        handler: Box<dyn Handler>,
    ) -> HandlerRegistration {
        HandlerRegistration::new(name, matcher, vec![Method::GET], handler)
    }

    fn error_body(sink: &ResponseSink) -> serde_json::Value {
        serde_json::from_slice(sink.body()).unwrap()
    }

    #[test]
    fn unmatched_path_is_unknown_command_and_invokes_nothing() {
        let called = Arc::new(AtomicBool::new(false));
        let dispatcher = Dispatcher::new(vec![registration(
            "sentinel",
            Box::new(MatchNone),
            Box::new(SentinelHandler {
                called: called.clone(),
            }),
        )]);

        let mut sink = ResponseSink::new();
        dispatcher.dispatch(&request(Method::GET, "/nope"), &mut sink);

        assert!(!called.load(Ordering::SeqCst), "sentinel must not be called");
        assert!(sink.is_closed());
        assert_eq!(sink.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_body(&sink)["value"]["error"], "unknown command");
    }

    #[test]
    fn first_matching_registration_wins() {
        let first = Arc::new(AtomicBool::new(false));
        let second = Arc::new(AtomicBool::new(false));
        let dispatcher = Dispatcher::new(vec![
            registration(
                "first",
                Box::new(MatchAll),
                Box::new(SentinelHandler {
                    called: first.clone(),
                }),
            ),
            registration(
                "second",
                Box::new(MatchAll),
                Box::new(SentinelHandler {
                    called: second.clone(),
                }),
            ),
        ]);

        let mut sink = ResponseSink::new();
        dispatcher.dispatch(&request(Method::GET, "/anything"), &mut sink);

        assert!(first.load(Ordering::SeqCst));
        assert!(!second.load(Ordering::SeqCst));
    }

    #[test]
    fn panicking_handler_becomes_generic_500() {
        let dispatcher = Dispatcher::new(vec![registration(
            "panicky",
            Box::new(MatchAll),
            Box::new(PanickingHandler),
        )]);

        let mut sink = ResponseSink::new();
        dispatcher.dispatch(&request(Method::GET, "/boom"), &mut sink);

        assert!(sink.is_closed());
        assert_eq!(sink.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = error_body(&sink);
        assert_eq!(body["value"]["error"], "unknown error");
        assert!(
            !body["value"]["message"].as_str().unwrap().contains("exploded"),
            "panic detail must not leak to the client"
        );
    }

    #[test]
    fn handler_without_response_becomes_500() {
        let dispatcher = Dispatcher::new(vec![registration(
            "mute",
            Box::new(MatchAll),
            Box::new(NoResponseHandler),
        )]);

        let mut sink = ResponseSink::new();
        dispatcher.dispatch(&request(Method::GET, "/mute"), &mut sink);

        assert!(sink.is_closed());
        assert_eq!(sink.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_is_never_appended_to_partial_output() {
        let dispatcher = Dispatcher::new(vec![registration(
            "partial",
            Box::new(MatchAll),
            Box::new(PartialWriteHandler),
        )]);

        let mut sink = ResponseSink::new();
        dispatcher.dispatch(&request(Method::GET, "/partial"), &mut sink);

        assert!(sink.is_closed());
        assert_eq!(sink.status(), StatusCode::BAD_REQUEST);
        assert!(!sink.body().starts_with(b"partial garbage"));
        // Body is pure JSON.
        assert_eq!(error_body(&sink)["value"]["error"], "invalid argument");
    }

    #[test]
    fn content_length_matches_body_on_error_paths() {
        let dispatcher = Dispatcher::new(vec![]);
        let mut sink = ResponseSink::new();
        dispatcher.dispatch(&request(Method::GET, "/missing"), &mut sink);

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
}
