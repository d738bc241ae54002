//! Build tooling for the editor front-end.
//!
//! Holds the committed build configuration, the HTML transform plugins run on
//! every entry page, the dev server that proxies backend paths, and the
//! production page build.

pub mod build;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod plugin;
pub mod routing;

pub use config::schema::{get_configuration, BuildConfig};
pub use http::DevServer;
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use plugin::{HtmlMinifierPlugin, PluginContainer};
