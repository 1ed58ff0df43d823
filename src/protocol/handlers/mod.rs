//! Concrete command handlers.
//!
//! One module per protocol command (or tight command family). Each handler
//! calls `base_validate` first, then applies its own exact method + path
//! rule: on match it writes one complete response, on mismatch it returns
//! `InvalidCommandMethod`.

pub mod session;
pub mod session_manager;
pub mod shutdown;
pub mod status;

pub use session::SessionHandler;
pub use session_manager::SessionManagerHandler;
pub use shutdown::{ShutdownHandler, SHUTDOWN_BODY};
pub use status::StatusHandler;
