//! Dev server setup.
//!
//! # Responsibilities
//! - Create Axum Router with the dev handler
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Dispatch requests to the proxy or to local pages/assets

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::BuildConfig;
use crate::http::pages;
use crate::lifecycle::ShutdownSignal;
use crate::http::proxy::{self, ProxyClient};
use crate::observability::metrics::{self, RequestKind};
use crate::plugin::PluginContainer;
use crate::routing::{RouteError, Router as ProxyRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BuildConfig>,
    pub router: Arc<ProxyRouter>,
    pub plugins: Arc<PluginContainer>,
    pub client: ProxyClient,
    pub assets: ServeDir,
}

/// Development server for the editor front-end.
pub struct DevServer {
    router: Router,
    config: Arc<BuildConfig>,
}

impl DevServer {
    /// Create a new dev server with the given configuration and plugins.
    pub fn new(config: BuildConfig, plugins: PluginContainer) -> Result<Self, RouteError> {
        let proxy_router = Arc::new(ProxyRouter::from_config(&config.server.proxy)?);

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let config = Arc::new(config);
        let state = AppState {
            router: proxy_router,
            plugins: Arc::new(plugins),
            client,
            assets: ServeDir::new(&config.root),
            config: config.clone(),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dev_handler))
            .route("/", any(dev_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal resolves.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base = %self.config.base,
            root = %self.config.root.display(),
            proxy_rules = self.config.server.proxy.len(),
            "Dev server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Dev server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }
}

/// Proxies requests under a configured prefix, serves everything else locally.
async fn dev_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let Some(route) = state.router.match_request(&request) else {
        return pages::serve(&state, request).await;
    };

    let start = Instant::now();
    let path = request.uri().path().to_string();
    match proxy::forward(&state.client, route, request).await {
        Ok(response) => {
            metrics::record_request(RequestKind::Proxy, response.status().as_u16(), start);
            response
        }
        Err(e) => {
            tracing::error!(path = %path, target = %route.target, error = %e, "Proxy error");
            metrics::record_request(RequestKind::Proxy, 502, start);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
