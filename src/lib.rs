//! wraithdriver — a WebDriver-protocol automation server.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │                  WRAITHDRIVER                    │
//!                 │                                                  │
//!  HTTP request   │  ┌────────┐   ┌──────────┐   ┌───────────────┐  │
//!  ───────────────┼─▶│  http  │──▶│ protocol │──▶│   handlers    │  │
//!                 │  │ server │   │dispatcher│   │ (per command) │  │
//!                 │  └────────┘   └────┬─────┘   └──────┬────────┘  │
//!                 │                    │                │           │
//!                 │             error boundary    ┌─────▼────────┐  │
//!  HTTP response  │  ┌────────┐        │          │   session    │  │
//!  ◀──────────────┼──│  sink  │◀───────┴──────────│engine (trait)│  │
//!                 │  └────────┘                   └──────────────┘  │
//!                 │                                                  │
//!                 │  config · lifecycle (shutdown) · observability   │
//!                 └──────────────────────────────────────────────────┘
//! ```
//!
//! Commands are routed by an immutable registration table, not by axum route
//! patterns: the first registration whose path matcher accepts the parsed
//! URL wins, the handler enforces its own exact method rule, and a single
//! error boundary turns typed protocol errors (or panics) into the uniform
//! JSON error body. The response sink is write-once-then-closed, with
//! `Content-Length` always derived from the actual body.
//!
//! Shutdown is graceful: the `GET /.../shutdown` command acknowledges with a
//! fixed HTML page, then the serve loop stops accepting and drains in-flight
//! requests before the process exits.

// Core subsystems
pub mod config;
pub mod http;
pub mod protocol;
pub mod session;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::DriverConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use protocol::{Dispatcher, ProtocolError};
pub use session::{AutomationEngine, SessionRegistry};
