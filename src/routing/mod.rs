//! Dev-server proxy routing.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (rule lookup, longest prefix first)
//!     → matcher.rs (evaluate prefix)
//!     → Return: matched ProxyRoute or NoMatch (served locally)
//!
//! Rule Compilation (at startup):
//!     server.proxy map
//!     → Parse target origins
//!     → Sort by prefix length
//!     → Freeze as immutable Router
//! ```

pub mod matcher;
pub mod router;

pub use router::{ProxyRoute, RouteError, Router};
