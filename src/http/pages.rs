//! Local serving of entry pages and static assets.
//!
//! # Responsibilities
//! - Map request paths under the base path onto the page root
//! - Run HTML pages through the plugin pipeline
//! - Serve every other file as-is
//!
//! # Design Decisions
//! - Paths outside the base answer 404; `/` redirects to the base
//! - Paths that would leave the page root answer 400 before any file access
//! - A failing transform answers 500 for that page; the server keeps running
//! - SPA mode falls back to `index.html` for extensionless paths

use std::path::{Component, Path};
use std::time::Instant;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower::ServiceExt;

use crate::config::AppType;
use crate::http::server::AppState;
use crate::observability::metrics::{self, RequestKind};
use crate::plugin::{HtmlContext, Invocation};

/// What a request path under the base resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// An HTML entry page, relative to the page root.
    Page(String),
    /// Any other file, relative to the page root.
    Asset(String),
}

/// Resolve a path relative to the base onto the page root.
pub fn resolve(rel: &str) -> Resolved {
    if rel.is_empty() || rel.ends_with('/') {
        Resolved::Page(format!("{rel}index.html"))
    } else if rel.ends_with(".html") {
        Resolved::Page(rel.to_string())
    } else {
        Resolved::Asset(rel.to_string())
    }
}

/// True if `rel` names something under the page root.
///
/// Every segment must be a single normal path component. Only the last
/// segment may be empty (a directory request); an empty segment anywhere
/// else would make the joined path absolute.
pub fn is_safe_relative(rel: &str) -> bool {
    let mut segments = rel.split('/').peekable();
    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            if segments.peek().is_some() {
                return false;
            }
            continue;
        }
        if segment.contains('\\') {
            return false;
        }
        let mut components = Path::new(segment).components();
        let is_normal = matches!(components.next(), Some(Component::Normal(_)));
        if !is_normal || components.next().is_some() {
            return false;
        }
    }
    true
}

/// Serve a request that matched no proxy rule.
pub async fn serve(state: &AppState, request: Request<Body>) -> Response {
    let start = Instant::now();
    let path = request.uri().path().to_string();
    let base = state.config.base.as_str();

    let Some(rel) = path.strip_prefix(base) else {
        return outside_base(&path, base, start);
    };

    if !is_safe_relative(rel) {
        tracing::warn!(path = %path, "Rejected path escaping the page root");
        metrics::record_request(RequestKind::Static, 400, start);
        return (StatusCode::BAD_REQUEST, "Invalid path").into_response();
    }

    let response = match resolve(rel) {
        Resolved::Page(page) => serve_page(state, page).await,
        Resolved::Asset(asset) => {
            let is_spa_route = state.config.app_type == AppType::Spa
                && Path::new(&asset).extension().is_none()
                && !state.config.root.join(&asset).exists();
            if is_spa_route {
                serve_page(state, "index.html".to_string()).await
            } else {
                serve_asset(state, &asset, request).await
            }
        }
    };

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"text/html"));
    let kind = if is_html {
        RequestKind::Page
    } else {
        RequestKind::Static
    };
    metrics::record_request(kind, response.status().as_u16(), start);
    response
}

/// `/` and the bare base redirect to the base; anything else is 404.
fn outside_base(path: &str, base: &str, start: Instant) -> Response {
    if path == "/" || path == base.trim_end_matches('/') {
        metrics::record_request(RequestKind::Static, 307, start);
        return Redirect::temporary(base).into_response();
    }
    tracing::debug!(path = %path, base = %base, "Request outside base path");
    metrics::record_request(RequestKind::Static, 404, start);
    (
        StatusCode::NOT_FOUND,
        format!("The server is configured with a public base URL of {base}"),
    )
        .into_response()
}

async fn serve_page(state: &AppState, page: String) -> Response {
    let file = state.config.root.join(&page);
    let html = match tokio::fs::read_to_string(&file).await {
        Ok(html) => html,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "Not found").into_response();
        }
        Err(e) => {
            tracing::error!(page = %page, error = %e, "Failed to read page");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read page").into_response();
        }
    };

    let plugins = state.plugins.clone();
    let ctx = HtmlContext::new(page.clone(), Invocation::Dev);
    match tokio::task::spawn_blocking(move || plugins.transform_index_html(html, &ctx)).await {
        Ok(Ok(html)) => Html(html).into_response(),
        Ok(Err(e)) => {
            tracing::error!(page = %page, error = %e, "Transform failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(page = %page, error = %e, "Transform task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Transform task failed").into_response()
        }
    }
}

async fn serve_asset(state: &AppState, asset: &str, request: Request<Body>) -> Response {
    let uri: Uri = match format!("/{asset}").parse() {
        Ok(uri) => uri,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid path").into_response(),
    };

    let (mut parts, body) = request.into_parts();
    parts.uri = uri;

    match state.assets.clone().oneshot(Request::from_parts(parts, body)).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use ::metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};

    use super::*;

    /// Collects the `status` label of every request counter registration.
    #[derive(Default)]
    struct StatusRecorder {
        statuses: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder for StatusRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            if key.name() == "devkit_requests_total" {
                let status = key.labels().find(|l| l.key() == "status");
                if let Some(label) = status {
                    self.statuses.lock().unwrap().push(label.value().to_string());
                }
            }
            Counter::noop()
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn requests_outside_base_are_counted() {
        let recorder = StatusRecorder::default();
        let statuses = recorder.statuses.clone();

        let responses = ::metrics::with_local_recorder(&recorder, || {
            ["/", "/editor", "/index.html"]
                .map(|path| outside_base(path, "/editor/", Instant::now()).status())
        });

        assert_eq!(
            responses,
            [StatusCode::TEMPORARY_REDIRECT, StatusCode::TEMPORARY_REDIRECT, StatusCode::NOT_FOUND]
        );
        assert_eq!(*statuses.lock().unwrap(), ["307", "307", "404"]);
    }

    #[test]
    fn resolves_pages_and_assets() {
        assert_eq!(resolve(""), Resolved::Page("index.html".into()));
        assert_eq!(resolve("share/"), Resolved::Page("share/index.html".into()));
        assert_eq!(resolve("about.html"), Resolved::Page("about.html".into()));
        assert_eq!(resolve("main.js"), Resolved::Asset("main.js".into()));
    }

    #[test]
    fn rejects_paths_escaping_root() {
        assert!(!is_safe_relative("../secret"));
        assert!(!is_safe_relative("a/../../b"));
        assert!(!is_safe_relative("/etc/index.html"));
        assert!(!is_safe_relative("/etc/"));
        assert!(!is_safe_relative("/"));
        assert!(!is_safe_relative("a//b.html"));
        assert!(!is_safe_relative("./index.html"));
        assert!(!is_safe_relative("a\\..\\b"));

        assert!(is_safe_relative(""));
        assert!(is_safe_relative("index.html"));
        assert!(is_safe_relative("share/"));
        assert!(is_safe_relative("a/..b/c.js"));
    }
}
