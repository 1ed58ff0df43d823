//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Shutdown command or OS signal → broadcast → stop accepting → drain → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → same broadcast as the protocol shutdown command
//! ```
//!
//! # Design Decisions
//! - One broadcast channel feeds every waiter; sources are interchangeable
//! - Drain is graceful: in-flight requests complete before the process exits

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
