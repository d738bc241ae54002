//! Forwarding of proxied requests.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the target origin
//! - Forward method, headers and body unchanged
//! - Relay the upstream response verbatim
//!
//! # Design Decisions
//! - Streaming in both directions, no buffering
//! - Host header is kept as sent by the client
//! - No retries: an unreachable target is a 502 for that request only

use axum::body::Body;
use axum::http::uri::{PathAndQuery, Scheme};
use axum::http::{Request, Response, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use thiserror::Error;

use crate::routing::ProxyRoute;

/// HTTP client shared by all proxied requests.
pub type ProxyClient = Client<HttpConnector, Body>;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to build upstream URI: {0}")]
    Uri(#[from] axum::http::Error),

    #[error("upstream request to {target} failed: {source}")]
    Upstream {
        target: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
}

/// Build the upstream URI: target origin plus the original path and query.
pub fn upstream_uri(route: &ProxyRoute, original: &Uri) -> Result<Uri, axum::http::Error> {
    let path_and_query = original
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));

    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(route.authority.clone())
        .path_and_query(path_and_query)
        .build()
}

/// Forward `request` to the route's target and return its response.
pub async fn forward(
    client: &ProxyClient,
    route: &ProxyRoute,
    request: Request<Body>,
) -> Result<Response<Body>, ProxyError> {
    let (mut parts, body) = request.into_parts();
    parts.uri = upstream_uri(route, &parts.uri)?;

    tracing::debug!(
        method = %parts.method,
        uri = %parts.uri,
        prefix = route.prefix(),
        "Forwarding request"
    );

    let response = client
        .request(Request::from_parts(parts, body))
        .await
        .map_err(|source| ProxyError::Upstream {
            target: route.target.clone(),
            source,
        })?;

    let (parts, body) = response.into_parts();
    Ok(Response::from_parts(parts, Body::new(body)))
}
