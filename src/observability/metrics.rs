//! Metrics collection.
//!
//! # Metrics
//! - `devkit_requests_total` (counter): dev server requests by kind, status
//! - `devkit_request_duration_seconds` (histogram): latency by kind
//! - `devkit_html_transforms_total` (counter): HTML pipeline runs by outcome
//!
//! No exporter is installed here; the macros are no-ops until a recorder is.

use std::time::Instant;

/// How the dev server answered a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Proxy,
    Page,
    Static,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Proxy => "proxy",
            RequestKind::Page => "page",
            RequestKind::Static => "static",
        }
    }
}

pub fn record_request(kind: RequestKind, status: u16, start: Instant) {
    metrics::counter!(
        "devkit_requests_total",
        "kind" => kind.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("devkit_request_duration_seconds", "kind" => kind.as_str())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_html_transform(success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!("devkit_html_transforms_total", "outcome" => outcome).increment(1);
}
