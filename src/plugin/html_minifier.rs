//! HTML minification hook.
//!
//! This module uses [`minify_html_onepass`] under the hood. The one-pass minifier
//! parses as it goes and rejects malformed markup, so a broken page fails the
//! transform instead of being emitted half-minified.

use minify_html_onepass::Cfg;

use crate::config::HtmlMinifyOptions;
use crate::plugin::{HookOrder, HtmlContext, Plugin, PluginError};

pub const PLUGIN_NAME: &str = "html-minifier";

/// Collapses whitespace, removes comments and minifies embedded style and script.
#[derive(Debug, Clone)]
pub struct HtmlMinifierPlugin {
    options: HtmlMinifyOptions,
}

impl HtmlMinifierPlugin {
    pub fn new(options: HtmlMinifyOptions) -> Self {
        Self { options }
    }

    /// Minify a complete HTML document.
    pub fn minify(&self, html: &str) -> Result<String, PluginError> {
        let cfg = Cfg {
            minify_js: self.options.minify_js,
            minify_css: self.options.minify_css,
        };

        let minified = minify_html_onepass::copy(html.as_bytes(), &cfg).map_err(|e| {
            let position = e.position;
            PluginError::MalformedHtml {
                position,
                message: e.error_type.message(),
            }
        })?;

        String::from_utf8(minified).map_err(|e| PluginError::MalformedHtml {
            position: e.utf8_error().valid_up_to(),
            message: "minified output is not valid UTF-8".to_string(),
        })
    }
}

impl Default for HtmlMinifierPlugin {
    fn default() -> Self {
        Self::new(HtmlMinifyOptions::default())
    }
}

impl Plugin for HtmlMinifierPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn order(&self) -> HookOrder {
        HookOrder::Post
    }

    fn transform_index_html(&self, html: String, ctx: &HtmlContext) -> Result<String, PluginError> {
        let minified = self.minify(&html)?;
        tracing::debug!(
            page = %ctx.path,
            before = html.len(),
            after = minified.len(),
            "Minified HTML"
        );
        Ok(minified)
    }
}
