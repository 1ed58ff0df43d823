//! WebDriver command dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! IncomingRequest (method, path, headers, body)
//!     → url.rs (total path decomposition)
//!     → dispatcher.rs (first matcher accepting the path shape wins)
//!     → matcher.rs (evaluate structural match, method-independent)
//!     → handler.rs (base validation, explicit super-call discipline)
//!     → handlers/* (exact method + path rule, write response or raise)
//!     → errors.rs (typed failure → uniform JSON error body)
//! ```
//!
//! # Design Decisions
//! - Registration table built once at startup, immutable at runtime
//! - Exactly one of "handled" or "errored" per request; the sink always
//!   ends closed and well-formed
//! - Handlers raise, never write error bodies; translation happens once at
//!   the dispatcher's boundary

pub mod dispatcher;
pub mod errors;
pub mod handler;
pub mod handlers;
pub mod matcher;
pub mod url;

pub use dispatcher::{Dispatcher, HandlerRegistration};
pub use errors::ProtocolError;
pub use handler::Handler;
pub use url::ParsedUrl;
