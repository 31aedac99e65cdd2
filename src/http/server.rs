//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (CORS, preflight, request ID, tracing)
//! - Bind server to listener
//! - Dispatch searches to the gateway handler
//! - Serve the static health check

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::gateway::handler::{search_get, search_post};
use crate::gateway::{GatewayError, UpstreamClient};
use crate::http::cors;
use crate::http::request::{request_span, MakeRequestUuid};

/// Path of the search forwarding endpoint.
pub const SEARCH_PATH: &str = "/api/tdt-search";

/// Path of the readiness probe.
pub const HEALTH_PATH: &str = "/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

/// HTTP server for the search gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let state = AppState {
            upstream: Arc::new(UpstreamClient::new(&config.upstream)?),
        };

        let router = build_router(state);
        Ok(Self { router, config })
    }

    /// A clone of the fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "Search gateway started"
        );
        tracing::info!("Search endpoint: http://localhost:{}{}", addr.port(), SEARCH_PATH);
        tracing::info!("Health check:    http://localhost:{}{}", addr.port(), HEALTH_PATH);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route(SEARCH_PATH, get(search_get).post(search_post))
        .route(HEALTH_PATH, get(health_handler))
        .fallback(not_found)
        .with_state(state);

    cors::apply(router)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "proxy server is running",
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
