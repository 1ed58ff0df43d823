//! HTTP server setup.
//!
//! # Responsibilities
//! - Bind the axum app with a catch-all route feeding the dispatcher
//! - Wire up middleware (request timeout, tracing)
//! - Serve with graceful shutdown: the protocol shutdown command and OS
//!   signals both drain in-flight requests before the loop exits
//!
//! # Design Decisions
//! - axum's own router only carries the catch-all; command routing is the
//!   dispatcher's registration table, not axum route patterns
//! - The request body is buffered up to a configured limit before dispatch;
//!   command payloads are small JSON documents

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::DriverConfig;
use crate::http::request::IncomingRequest;
use crate::http::sink::ResponseSink;
use crate::lifecycle::{signals, Shutdown};
use crate::protocol::{Dispatcher, ProtocolError};

/// Application state injected into the catch-all handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub body_limit: usize,
}

/// HTTP server for the driver.
pub struct HttpServer {
    router: Router,
    shutdown: Arc<Shutdown>,
}

impl HttpServer {
    /// Create a new HTTP server around a dispatcher and shutdown coordinator.
    pub fn new(config: &DriverConfig, dispatcher: Arc<Dispatcher>, shutdown: Arc<Shutdown>) -> Self {
        let state = AppState {
            dispatcher,
            body_limit: config.listener.max_body_bytes,
        };
        let router = Self::build_router(config, state);
        Self { router, shutdown }
    }

    /// Build the axum router: every method on every path lands in the
    /// dispatcher.
    fn build_router(config: &DriverConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until shutdown is requested, then drain and return.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { signals::shutdown_requested(&shutdown).await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: buffer the body, hand the request to the dispatcher,
/// emit whatever the sink holds.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let bytes = match axum::body::to_bytes(body, state.body_limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "failed to read request body");
            let mut sink = ResponseSink::new();
            state.dispatcher.reject(
                &mut sink,
                &ProtocolError::invalid_argument("request body unreadable or too large"),
            );
            return sink.into_response();
        }
    };

    let req = IncomingRequest::new(parts.method, path, parts.headers, bytes);
    let mut sink = ResponseSink::new();
    state.dispatcher.dispatch(&req, &mut sink);
    sink.into_response()
}
