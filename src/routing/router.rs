//! Proxy rule lookup.
//!
//! # Responsibilities
//! - Store compiled proxy rules
//! - Look up the rule for a request path
//! - Return matched rule or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Longest prefix checked first
//! - O(n) prefix scan (acceptable for typical rule counts)

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::body::Body;
use axum::http::uri::Authority;
use axum::http::Request;
use url::Url;

use crate::config::ProxyRule;
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// A compiled proxy rule.
#[derive(Debug, Clone)]
pub struct ProxyRoute {
    matcher: PathPrefixMatcher,
    /// Target origin authority (host:port).
    pub authority: Authority,
    /// Target origin as configured, for logging.
    pub target: String,
}

impl ProxyRoute {
    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }
}

/// Error compiling a proxy rule.
#[derive(Debug, thiserror::Error)]
#[error("invalid proxy target {target:?}: {reason}")]
pub struct RouteError {
    pub target: String,
    pub reason: String,
}

/// Immutable proxy rule table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<ProxyRoute>,
}

impl Router {
    /// Compile the configured proxy rules.
    pub fn from_config(rules: &BTreeMap<String, ProxyRule>) -> Result<Self, RouteError> {
        let mut routes = rules
            .iter()
            .map(|(prefix, rule)| -> Result<ProxyRoute, RouteError> {
                Ok(ProxyRoute {
                    matcher: PathPrefixMatcher::new(prefix.clone()),
                    authority: parse_authority(&rule.target)?,
                    target: rule.target.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        routes.sort_by(|a, b| b.prefix().len().cmp(&a.prefix().len()));

        Ok(Self { routes })
    }

    /// Find the rule whose prefix matches the request path.
    pub fn match_request(&self, req: &Request<Body>) -> Option<&ProxyRoute> {
        self.routes.iter().find(|r| r.matcher.matches(req))
    }

    /// Find the rule whose prefix matches `path`.
    pub fn match_path(&self, path: &str) -> Option<&ProxyRoute> {
        self.routes.iter().find(|r| r.matcher.matches_path(path))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn parse_authority(target: &str) -> Result<Authority, RouteError> {
    let error = |reason: String| RouteError {
        target: target.to_string(),
        reason,
    };

    let url = Url::parse(target).map_err(|e| error(e.to_string()))?;
    let host = url.host_str().ok_or_else(|| error("missing host".to_string()))?;
    let authority = match url.port_or_known_default() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    Authority::from_str(&authority).map_err(|e| error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(entries: &[(&str, &str)]) -> BTreeMap<String, ProxyRule> {
        entries
            .iter()
            .map(|(prefix, target)| {
                (
                    prefix.to_string(),
                    ProxyRule {
                        target: target.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn matches_configured_prefix() {
        let router = Router::from_config(&rules(&[("/s", "http://localhost:5000")])).unwrap();

        let route = router.match_path("/s/foo").unwrap();
        assert_eq!(route.authority.as_str(), "localhost:5000");
        assert!(router.match_path("/index.html").is_none());
        assert!(router.match_path("/editor/s").is_none());
    }

    #[test]
    fn longest_prefix_wins() {
        let router = Router::from_config(&rules(&[
            ("/s", "http://localhost:5000"),
            ("/s/share", "http://localhost:6000"),
        ]))
        .unwrap();

        assert_eq!(router.match_path("/s/share/1").unwrap().prefix(), "/s/share");
        assert_eq!(router.match_path("/s/other").unwrap().prefix(), "/s");
    }

    #[test]
    fn default_port_is_explicit() {
        let router = Router::from_config(&rules(&[("/api", "http://backend")])).unwrap();
        assert_eq!(router.match_path("/api").unwrap().authority.as_str(), "backend:80");
    }

    #[test]
    fn rejects_unparseable_target() {
        assert!(Router::from_config(&rules(&[("/s", "not a url")])).is_err());
    }
}
