//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Command handler
//!     → engine.rs (AutomationEngine trait, the browser-control boundary)
//!     → registry.rs (in-memory implementation: session table, page state)
//! ```
//!
//! # Design Decisions
//! - Handlers depend only on the trait; swapping in a real browser backend
//!   touches nothing in the dispatch core
//! - Session state is concurrent-map-per-id, no global lock

pub mod engine;
pub mod registry;

pub use engine::AutomationEngine;
pub use registry::SessionRegistry;
