//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dev server, plugin pipeline and page build produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured fields (page, path, target, status) on every event
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
