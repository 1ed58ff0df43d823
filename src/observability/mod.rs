//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch path produces:
//!     → logging.rs (structured tracing events: method, path, handler, status)
//!     → metrics.rs (request counter + latency histogram)
//!
//! Consumers:
//!     → stdout log (RUST_LOG-filtered)
//!     → optional Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
