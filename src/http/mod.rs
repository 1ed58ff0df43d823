//! HTTP surface of the driver.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum catch-all, timeout + trace layers)
//!     → request.rs (immutable IncomingRequest with parsed URL)
//!     → [protocol layer dispatches the command]
//!     → sink.rs (write-once response buffer → axum Response)
//! ```

pub mod request;
pub mod server;
pub mod sink;

pub use request::IncomingRequest;
pub use server::HttpServer;
pub use sink::{ResponseSink, SinkError};
