//! Ordered plugin registry.

use std::sync::Arc;

use crate::config::BuildConfig;
use crate::observability::metrics;
use crate::plugin::{HtmlContext, HtmlMinifierPlugin, Plugin, PluginError};

/// Holds the registered plugins in execution order.
///
/// Immutable once built; share it via `Arc` between the dev server and build tasks.
#[derive(Debug, Default)]
pub struct PluginContainer {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the container registered by the editor configuration.
    pub fn from_config(config: &BuildConfig) -> Self {
        let mut container = Self::new();
        container.plugins.push(Arc::new(HtmlMinifierPlugin::new(config.html)));
        container
    }

    /// Register a plugin. Names must be unique.
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> Result<(), PluginError> {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            return Err(PluginError::DuplicateName(plugin.name().to_string()));
        }

        // Stable insert: after every plugin of the same or an earlier phase.
        let order = plugin.order();
        let index = self
            .plugins
            .iter()
            .position(|p| p.order() > order)
            .unwrap_or(self.plugins.len());
        self.plugins.insert(index, Arc::new(plugin));
        Ok(())
    }

    /// Plugin names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every plugin over `html`, in phase order.
    pub fn transform_index_html(&self, html: String, ctx: &HtmlContext) -> Result<String, PluginError> {
        let mut html = html;
        for plugin in &self.plugins {
            html = match plugin.transform_index_html(html, ctx) {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(
                        plugin = plugin.name(),
                        page = %ctx.path,
                        error = %e,
                        "HTML transform failed"
                    );
                    metrics::record_html_transform(false);
                    return Err(PluginError::Hook {
                        plugin: plugin.name().to_string(),
                        source: Box::new(e),
                    });
                }
            };
        }

        metrics::record_html_transform(true);
        Ok(html)
    }
}
