//! Chat-completions gateway abstraction.
//!
//! [`gateway::GatewayClient`] is the single upstream client; this module
//! holds the pieces callers interact with — the error taxonomy, the tool
//! declaration passed down on each request, and the two-armed outcome of a
//! completion round trip.

pub mod gateway;

use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

/// Upstream failure classification, resolved from the HTTP status (or the
/// transport layer) before any body parsing is attempted.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Upstream 429: caller should back off and retry later.
    #[error("gateway rate limited")]
    RateLimited,

    /// Upstream 402: the account backing the API key is out of credits.
    #[error("gateway quota exhausted")]
    QuotaExhausted,

    /// Any other non-2xx upstream status. The status and raw body are
    /// logged at the classification site; neither is carried here so they
    /// can never leak into a client-visible response.
    #[error("gateway returned HTTP {status}")]
    Upstream { status: u16 },

    /// Connection, TLS, or timeout failure before a status was obtained.
    #[error("{0}")]
    Transport(String),

    /// A 2xx response whose body does not match the expected envelope.
    #[error("malformed upstream payload: {0}")]
    MalformedPayload(String),
}

// ── Tool declaration ──────────────────────────────────────────────────────────

/// A single callable tool the model is forced to invoke.
///
/// `parameters` is a JSON-schema value serialized verbatim into the request;
/// the gateway does not interpret it.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Result of one successful (2xx) completion round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// The model invoked the tool; `arguments` is the raw JSON-encoded
    /// argument string, unparsed — schema validation is the caller's job.
    ToolCall { arguments: String },

    /// The model answered in free text despite the forced tool choice.
    /// Empty string when the message carried no content at all.
    Content(String),
}
