//! HTML transform plugins.
//!
//! # Data Flow
//! ```text
//! rendered entry page (raw HTML)
//!     → container.rs (plugins ordered pre → normal → post)
//!     → each plugin's transform_index_html, output feeding the next
//!     → html_minifier.rs (post phase, last to run)
//!     → final document (dev response or build output)
//! ```
//!
//! # Design Decisions
//! - Plugins are pure: no I/O, no shared mutable state, safe to run concurrently
//! - First failure stops the pipeline; no best-effort output
//! - Order within a phase is registration order

pub mod container;
pub mod html_minifier;

use thiserror::Error;

pub use container::PluginContainer;
pub use html_minifier::HtmlMinifierPlugin;

/// Phase a plugin hook runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookOrder {
    /// Runs before the normal hooks.
    Pre,
    /// Default phase.
    Normal,
    /// Runs after every other hook, on the final document.
    Post,
}

/// Where a transform was invoked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// Served by the dev server.
    Dev,
    /// Emitted by the production page build.
    Build,
}

/// Context handed to every `transform_index_html` call.
#[derive(Debug, Clone)]
pub struct HtmlContext {
    /// Page path relative to the page root (e.g., "index.html").
    pub path: String,
    pub invocation: Invocation,
}

impl HtmlContext {
    pub fn new(path: impl Into<String>, invocation: Invocation) -> Self {
        Self {
            path: path.into(),
            invocation,
        }
    }
}

/// Errors raised by plugins and the plugin container.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("malformed HTML at byte {position}: {message}")]
    MalformedHtml { position: usize, message: String },

    #[error("plugin {0:?} is already registered")]
    DuplicateName(String),

    #[error("plugin {plugin:?} failed: {source}")]
    Hook {
        plugin: String,
        #[source]
        source: Box<PluginError>,
    },
}

/// A transform applied to every HTML entry page.
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Unique name, used for diagnostics and duplicate detection.
    fn name(&self) -> &str;

    /// Phase the hook runs in.
    fn order(&self) -> HookOrder {
        HookOrder::Normal
    }

    /// Return a complete replacement for `html`.
    fn transform_index_html(&self, html: String, ctx: &HtmlContext) -> Result<String, PluginError>;
}
