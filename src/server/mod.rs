//! Axum HTTP surface for the offload endpoint.
//!
//! `run()` drives the axum event loop; a [`CancellationToken`] is wired to
//! axum's graceful shutdown so Ctrl-C (or a test) can stop the listener.
//!
//! ## URL layout
//!
//! ```text
//! OPTIONS /offload-process  → 204 pre-flight, no upstream I/O
//! POST    /offload-process  → ExtractionResult | ErrorResult
//! GET     /api/health       → liveness probe
//! ```
//!
//! The permissive cross-origin headers are attached by a response layer to
//! every response, error paths included, so no handler can forget them.

mod api;

use axum::http::{HeaderValue, header::HeaderName};
use axum::middleware::map_response;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::llm::gateway::GatewayClient;

// ── Cross-origin headers ──────────────────────────────────────────────────────

/// Header values required by the browser clients (Supabase JS client
/// included, hence the `x-supabase-*` allow-list).
const CORS_HEADERS: [(&str, &str); 2] = [
    ("access-control-allow-origin", "*"),
    (
        "access-control-allow-headers",
        "authorization, x-client-info, apikey, content-type, \
         x-supabase-client-platform, x-supabase-client-platform-version, \
         x-supabase-client-runtime, x-supabase-client-runtime-version",
    ),
];

/// Attach the cross-origin headers to every outgoing response.
async fn attach_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — the gateway client is reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; offload requests then fail
    /// with a configuration error without touching the upstream.
    pub gateway: Option<GatewayClient>,
}

// ── Construction ──────────────────────────────────────────────────────────────

/// Build the router from resolved configuration.
pub fn build_app(config: &Config) -> Result<Router, AppError> {
    let gateway = match &config.api_key {
        Some(key) => Some(
            GatewayClient::new(&config.gateway, key.clone())
                .map_err(|e| AppError::Server(format!("gateway client: {e}")))?,
        ),
        None => None,
    };
    Ok(build_router(AppState { gateway }))
}

/// Assemble routes and the cross-origin response layer around `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/offload-process", post(api::offload).options(api::preflight))
        .route("/api/health", get(api::health))
        .layer(map_response(attach_cors_headers))
        .with_state(state)
}

// ── Server loop ───────────────────────────────────────────────────────────────

/// Bind and serve until `shutdown` is cancelled.
pub async fn run(config: &Config, shutdown: CancellationToken) -> Result<(), AppError> {
    let router = build_app(config)?;

    let listener = TcpListener::bind(&config.bind)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {}: {e}", config.bind)))?;

    info!(
        bind = %config.bind,
        model = %config.gateway.model,
        gateway_url = %config.gateway.api_base_url,
        api_key_present = config.api_key.is_some(),
        "offload server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("serve error: {e}")))?;

    info!("offload server shut down");
    Ok(())
}
