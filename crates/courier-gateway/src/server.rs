// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use courier_core::{CourierError, PluginAdapter, ServiceClock};
use courier_dispatch::Dispatcher;
use courier_scheduler::TokenRotationScheduler;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;
use crate::ingress::WebhookIngress;

/// State for the unauthenticated health and metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    pub clock: ServiceClock,
    /// Adapters probed by `/health`, reported by name.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub ingress: Arc<WebhookIngress>,
    pub dispatcher: Arc<Dispatcher>,
    pub rotation: Arc<TokenRotationScheduler>,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Bind address (mirrors `[server]` from courier-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the full route table.
///
/// - `GET|POST /webhooks/{platform}` public, authenticated per platform
/// - `GET /health`, `GET /metrics` public
/// - `POST /v1/channels/{id}/messages`, `GET /v1/tokens` bearer-authenticated
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route(
            "/webhooks/{platform}",
            get(handlers::verify_webhook).post(handlers::receive_webhook),
        )
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/channels/{id}/messages", post(handlers::send_message))
        .route("/v1/tokens", get(handlers::list_tokens))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
}

/// Serve until `shutdown` is cancelled, then drain in-flight requests.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), CourierError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CourierError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| CourierError::Internal(format!("gateway server error: {e}")))?;
    tracing::info!("gateway stopped");
    Ok(())
}
