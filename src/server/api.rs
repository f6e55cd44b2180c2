//! Axum handlers for the offload route.
//!
//! Each handler receives [`AppState`] via [`axum::extract::State`] and
//! returns an axum [`Response`]. The body is taken as raw bytes and parsed
//! here rather than through the `Json` extractor so that a malformed body
//! follows the generic-exception path (500 with the parse error's message)
//! instead of a framework-shaped 400/415.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::offload::{process, ErrorResult, OffloadError, OffloadRequest};

use super::AppState;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Translate a request-path failure into its status + JSON error body.
fn error_response(err: &OffloadError) -> Response {
    let mut message = err.to_string();
    if message.is_empty() {
        message = "Unknown error".to_string();
    }
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResult { error: message })).into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// OPTIONS /offload-process — pre-flight. Answered immediately with no body
/// and no upstream I/O; the cross-origin headers come from the response
/// layer.
pub(super) async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// POST /offload-process
pub(super) async fn offload(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("offload", %request_id);

    async move {
        let request: OffloadRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                let err = OffloadError::BadRequestBody(e.to_string());
                warn!(error = %err, "rejecting unparseable request body");
                return error_response(&err);
            }
        };

        match process::process(state.gateway.as_ref(), request).await {
            Ok(result) => (StatusCode::OK, Json(result)).into_response(),
            Err(err) => {
                warn!(status = err.status(), error = %err, "offload request failed");
                error_response(&err)
            }
        }
    }
    .instrument(span)
    .await
}

/// GET /api/health — liveness probe.
pub(super) async fn health() -> &'static str {
    "OK"
}
