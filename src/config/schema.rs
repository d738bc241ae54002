//! Configuration schema definitions.
//!
//! This module defines the complete build configuration of the editor front-end.
//! All types derive Serde traits for deserialization from config files, and the
//! `Default` impls reproduce the committed configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration consumed by the dev server and the page build.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Application type (multi-page or single-page).
    pub app_type: AppType,

    /// Public URL prefix under which built assets are served.
    pub base: String,

    /// Directory holding the HTML entry pages and static assets.
    pub root: PathBuf,

    /// Production build settings.
    pub build: BuildOptions,

    /// Development server settings.
    pub server: DevServerConfig,

    /// Options for the HTML minifier plugin.
    pub html: HtmlMinifyOptions,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            app_type: AppType::Mpa,
            base: "/editor/".to_string(),
            root: PathBuf::from("."),
            build: BuildOptions::default(),
            server: DevServerConfig::default(),
            html: HtmlMinifyOptions::default(),
        }
    }
}

/// How HTML entry pages are discovered and served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    /// Multi-page application: every `.html` file is an entry page.
    Mpa,
    /// Single-page application: only `index.html` is an entry page.
    Spa,
}

/// Production build settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Minify emitted script/style bundles.
    pub minify: bool,

    /// Emit source maps alongside bundles.
    pub sourcemap: bool,

    /// Output directory, relative to the working directory.
    pub out_dir: PathBuf,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            minify: true,
            sourcemap: true,
            out_dir: PathBuf::from("dist"),
        }
    }
}

/// Development server settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DevServerConfig {
    /// Bind host.
    pub host: String,

    /// Listening port.
    pub port: u16,

    /// Proxy rules keyed by URL path prefix.
    pub proxy: BTreeMap<String, ProxyRule>,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        let mut proxy = BTreeMap::new();
        proxy.insert(
            "/s".to_string(),
            ProxyRule {
                target: "http://localhost:5000".to_string(),
            },
        );

        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            proxy,
        }
    }
}

impl DevServerConfig {
    /// Socket address string the dev server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A single dev-server proxy rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyRule {
    /// Target origin (e.g., "http://localhost:5000").
    pub target: String,
}

/// HTML minifier options.
///
/// Whitespace collapsing and comment removal are always performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HtmlMinifyOptions {
    /// Minify the contents of `<style>` elements.
    pub minify_css: bool,

    /// Minify the contents of `<script>` elements.
    pub minify_js: bool,
}

impl Default for HtmlMinifyOptions {
    fn default() -> Self {
        Self {
            minify_css: true,
            minify_js: true,
        }
    }
}

/// Return the committed configuration of the editor front-end.
pub fn get_configuration() -> BuildConfig {
    BuildConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committed_configuration() {
        let config = get_configuration();
        assert_eq!(config.app_type, AppType::Mpa);
        assert_eq!(config.base, "/editor/");
        assert!(config.build.minify);
        assert!(config.build.sourcemap);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.proxy.len(), 1);
        assert_eq!(config.server.proxy["/s"].target, "http://localhost:5000");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: BuildConfig = toml::from_str(
            r#"
            app_type = "spa"

            [server]
            port = 4000
            "#,
        )
        .unwrap();

        assert_eq!(config.app_type, AppType::Spa);
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.base, "/editor/");
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.html.minify_js);
    }

    #[test]
    fn proxy_table_replaces_default_rules() {
        let config: BuildConfig = toml::from_str(
            r#"
            [server.proxy."/api"]
            target = "http://127.0.0.1:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.proxy.len(), 1);
        assert!(config.server.proxy.contains_key("/api"));
    }
}
