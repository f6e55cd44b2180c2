//! Offload domain — request/response types and the request-path error
//! taxonomy.
//!
//! Everything here is request-scoped; the service owns no persistent state.
//! The response contract is exclusive: a request yields either an
//! [`ExtractionResult`] or an [`ErrorResult`], never a mix of the two.

pub mod process;
pub mod prompt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::GatewayError;

// ── Request ───────────────────────────────────────────────────────────────────

/// Incoming request body. Both fields are optional at the parse layer so
/// that "missing text" is a validation outcome (400), not a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OffloadRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// Locale tag, e.g. `pt-BR`. Defaults to `pt-BR` when absent.
    #[serde(default)]
    pub language: Option<String>,
}

// ── Extracted items ───────────────────────────────────────────────────────────

/// What kind of record the caller should create from an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Event,
    Expense,
    Reminder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// One structured item extracted from the utterance.
///
/// `deny_unknown_fields` backs the postcondition check: an item carrying
/// fields outside the declared schema fails strict deserialization and is
/// dropped by the pipeline rather than forwarded uninspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractedItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    /// ISO calendar date (`YYYY-MM-DD`) when the utterance implies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `HH:MM` when the utterance implies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Monetary amount for expenses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Successful interpretation: extracted items (possibly empty, order
/// preserved) plus a short confirmation in the requested language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub items: Vec<ExtractedItem>,
    pub response: String,
}

/// Failure body — the only alternative to [`ExtractionResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

// ── Error taxonomy ────────────────────────────────────────────────────────────

/// Request-path failures. Display strings are the client-visible `error`
/// messages; anything diagnostic stays in the logs.
#[derive(Debug, Error)]
pub enum OffloadError {
    /// `text` missing or empty — reported before any upstream I/O.
    #[error("No text provided")]
    MissingText,

    /// No API key in the injected config; the upstream is never called.
    #[error("LLM_API_KEY is not configured")]
    MissingApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Credits exhausted. Please add funds.")]
    QuotaExhausted,

    /// Any other upstream failure status. Kept opaque so upstream
    /// diagnostics never reach the client; detail is logged at the
    /// classification site.
    #[error("AI processing failed")]
    UpstreamFailed,

    /// 2xx upstream response whose envelope or tool arguments did not parse.
    #[error("malformed upstream payload: {0}")]
    MalformedPayload(String),

    /// Transport-level failure talking to the upstream.
    #[error("{0}")]
    Transport(String),

    /// The request body was not valid JSON.
    #[error("invalid request body: {0}")]
    BadRequestBody(String),
}

impl OffloadError {
    /// HTTP status for this failure.
    pub fn status(&self) -> u16 {
        match self {
            OffloadError::MissingText => 400,
            OffloadError::RateLimited => 429,
            OffloadError::QuotaExhausted => 402,
            OffloadError::MissingApiKey
            | OffloadError::UpstreamFailed
            | OffloadError::MalformedPayload(_)
            | OffloadError::Transport(_)
            | OffloadError::BadRequestBody(_) => 500,
        }
    }
}

impl From<GatewayError> for OffloadError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::RateLimited => OffloadError::RateLimited,
            GatewayError::QuotaExhausted => OffloadError::QuotaExhausted,
            GatewayError::Upstream { .. } => OffloadError::UpstreamFailed,
            GatewayError::Transport(msg) => OffloadError::Transport(msg),
            GatewayError::MalformedPayload(msg) => OffloadError::MalformedPayload(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_kinds_use_lowercase_wire_names() {
        let item: ExtractedItem =
            serde_json::from_value(json!({ "type": "reminder", "title": "Pagar conta" })).unwrap();
        assert_eq!(item.kind, ItemKind::Reminder);
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["type"], "reminder");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = serde_json::from_value::<ExtractedItem>(
            json!({ "type": "note", "title": "x" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn extra_fields_are_rejected() {
        let result = serde_json::from_value::<ExtractedItem>(
            json!({ "type": "task", "title": "x", "location": "home" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn absent_optionals_are_omitted_from_output() {
        let item = ExtractedItem {
            kind: ItemKind::Task,
            title: "Comprar pão".into(),
            date: None,
            time: None,
            amount: None,
            category: None,
            priority: None,
        };
        let v = serde_json::to_value(&item).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("type"));
        assert!(obj.contains_key("title"));
    }

    #[test]
    fn full_item_round_trips_all_fields() {
        let src = json!({
            "type": "expense",
            "title": "Mercado",
            "date": "2024-03-02",
            "time": "18:30",
            "amount": 142.75,
            "category": "shopping",
            "priority": "high"
        });
        let item: ExtractedItem = serde_json::from_value(src.clone()).unwrap();
        assert_eq!(item.amount, Some(142.75));
        assert_eq!(item.priority, Some(Priority::High));
        assert_eq!(serde_json::to_value(&item).unwrap(), src);
    }

    #[test]
    fn status_mapping_matches_contract() {
        assert_eq!(OffloadError::MissingText.status(), 400);
        assert_eq!(OffloadError::RateLimited.status(), 429);
        assert_eq!(OffloadError::QuotaExhausted.status(), 402);
        assert_eq!(OffloadError::MissingApiKey.status(), 500);
        assert_eq!(OffloadError::UpstreamFailed.status(), 500);
        assert_eq!(OffloadError::Transport("boom".into()).status(), 500);
    }

    #[test]
    fn upstream_failure_message_is_opaque() {
        let e: OffloadError = GatewayError::Upstream { status: 503 }.into();
        assert_eq!(e.to_string(), "AI processing failed");
        assert!(!e.to_string().contains("503"));
    }
}
