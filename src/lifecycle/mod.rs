//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build plugin container → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C (trigger_on_ctrl_c) or Shutdown::trigger
//!         → ShutdownSignal resolves → Stop accepting → Drain in-flight → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
