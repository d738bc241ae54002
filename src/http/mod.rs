//! Dev server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing layer)
//!     → routing (proxy rule lookup)
//!         ├─ match    → proxy.rs (forward to target origin, relay response)
//!         └─ no match → pages.rs (base path, plugin pipeline, static files)
//!     → Send to client
//! ```

pub mod pages;
pub mod proxy;
pub mod server;

pub use proxy::ProxyError;
pub use server::DevServer;
