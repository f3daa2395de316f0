// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use parley_bot::BotEngine;
use parley_core::{Notifier, ParleyError, StorageAdapter};
use parley_realtime::RealtimeHub;
use tower_http::cors::CorsLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;
use crate::sessions::SessionStore;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The orchestrator, one per process.
    pub engine: Arc<BotEngine>,
    /// Storage handle for transcript and operator endpoints.
    pub storage: Arc<dyn StorageAdapter>,
    /// Realtime hub for live room fan-out.
    pub hub: Arc<RealtimeHub>,
    /// Mailer for campaign sends from the operator surface.
    pub notifier: Arc<dyn Notifier>,
    /// Bounded per-visitor session state, keyed by conversation id.
    pub sessions: Arc<SessionStore>,
    /// Authentication configuration for operator routes.
    pub auth: AuthConfig,
}

/// Gateway server configuration (mirrors GatewayConfig from parley-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Bearer token for operator auth (None = operator routes disabled).
    pub bearer_token: Option<String>,
}

/// Builds the full route tree. Split from [`start_server`] so tests can
/// drive the router without binding a socket.
pub fn router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    // Unauthenticated public routes: the embedded widget and health probes.
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/portal/{domain_id}/chat", post(handlers::post_chat))
        .with_state(state.clone());

    // Operator routes requiring authentication.
    let operator_routes = Router::new()
        .route(
            "/rooms/{chat_room_id}/messages",
            get(handlers::get_room_messages).post(handlers::post_operator_message),
        )
        .route(
            "/domains/{domain_id}/customers",
            get(handlers::get_domain_customers),
        )
        .route("/campaigns", post(handlers::post_create_campaign))
        .route(
            "/campaigns/{campaign_id}/template",
            put(handlers::put_campaign_template),
        )
        .route(
            "/campaigns/{campaign_id}/customers",
            post(handlers::post_campaign_customers),
        )
        .route(
            "/campaigns/{campaign_id}/send",
            post(handlers::post_campaign_send),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state.clone());

    // WebSocket route. Room ids are unguessable UUIDs handed out by the
    // chat endpoint, so the upgrade itself carries no bearer check.
    let ws_routes = Router::new()
        .route("/ws/rooms/{chat_room_id}", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(operator_routes)
        .merge(ws_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP/WebSocket server.
///
/// Binds to the configured host:port and serves routes:
/// - POST /portal/{domain_id}/chat (public, the widget endpoint)
/// - GET /health (public)
/// - GET|POST /rooms/{chat_room_id}/messages (operator, bearer auth)
/// - GET /domains/{domain_id}/customers (operator, bearer auth)
/// - POST /campaigns and the per-campaign template, customers, and send
///   routes (operator, bearer auth)
/// - GET /ws/rooms/{chat_room_id} (live room WebSocket)
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), ParleyError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ParleyError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| ParleyError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
