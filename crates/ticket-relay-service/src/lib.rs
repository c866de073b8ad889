//! # Ticket-Relay Service
//!
//! HTTP hosting shell for the ticket-relay webhook pipeline.
//!
//! This layer is deliberately thin: it captures the raw request bytes,
//! extracts the recognized headers, hands both to
//! [`ticket_relay_core::webhook::JiraWebhookHandler`], and maps the typed
//! outcome back onto an HTTP response. All pipeline policy lives in the
//! core crate.

pub mod config;


use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use ticket_relay_core::webhook::{JiraWebhookHandler, WebhookOutcome, WebhookRequest};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::{AgentSettings, JiraConfig, ServerConfig, ServiceConfig};

/// Primary webhook endpoint path.
pub const WEBHOOK_PATH: &str = "/webhooks/jira";

/// Legacy alias kept alive for a webhook registration that posts to the
/// misspelled path. See DESIGN.md before removing.
pub const WEBHOOK_PATH_ALIAS: &str = "/webooks/jira";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Webhook pipeline handling Jira deliveries
    pub webhook_handler: Arc<JiraWebhookHandler>,
}

/// Errors raised while starting or running the HTTP service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Failed to bind {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("HTTP server failed: {message}")]
    ServerFailed { message: String },
}

// ============================================================================
// Router and handlers
// ============================================================================

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(handle_jira_webhook))
        .route(WEBHOOK_PATH_ALIAS, post(handle_jira_webhook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// Handle a Jira webhook delivery.
///
/// The body is extracted as raw [`Bytes`] — before any JSON parsing — so
/// the core pipeline verifies the signature against the exact wire bytes.
async fn handle_jira_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_map: HashMap<String, String> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_lowercase(),
                value.to_str().unwrap_or("").to_string(),
            )
        })
        .collect();

    let request = WebhookRequest::from_http_headers(&header_map, body);
    let outcome = state.webhook_handler.handle(request).await;

    match outcome {
        WebhookOutcome::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response(),
        WebhookOutcome::Acknowledged { duplicate: true } => (
            StatusCode::OK,
            Json(json!({ "received": true, "duplicate": true })),
        )
            .into_response(),
        WebhookOutcome::Acknowledged { duplicate: false } => {
            (StatusCode::OK, Json(json!({ "received": true }))).into_response()
        }
    }
}

// ============================================================================
// Server lifecycle
// ============================================================================

/// Start the HTTP server and block until shutdown.
pub async fn start_server(config: &ServiceConfig, state: AppState) -> Result<(), ServiceError> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e: std::net::AddrParseError| ServiceError::InvalidConfiguration {
            message: format!("invalid bind address: {}", e),
        })?;

    let listener =
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: addr.to_string(),
                message: e.to_string(),
            })?;

    info!("Starting HTTP server on {}", addr);

    // axum's graceful shutdown stops accepting new connections immediately
    // and lets in-flight requests complete.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
