//! The offload pipeline: validation → completion call → postcondition
//! checks on the extracted items.
//!
//! One invocation, one upstream round trip, no retries. Every failure is
//! classified into [`OffloadError`] here or upstream in the gateway; the
//! HTTP layer only translates the error into a status + JSON body.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm::gateway::GatewayClient;
use crate::llm::ChatOutcome;
use crate::offload::prompt::{self, DEFAULT_LANGUAGE};
use crate::offload::{ExtractedItem, ExtractionResult, OffloadError, OffloadRequest};

/// Run one offload request against the gateway.
///
/// `gateway` is `None` when the deployment has no API key; that is a hard
/// failure reported before any upstream I/O. Returns the well-formed
/// [`ExtractionResult`] on success — including the content-fallback case
/// where the model ignored the forced tool choice.
pub async fn process(
    gateway: Option<&GatewayClient>,
    request: OffloadRequest,
) -> Result<ExtractionResult, OffloadError> {
    // Credential before text: a doubly invalid request reports the
    // configuration failure.
    let gateway = gateway.ok_or(OffloadError::MissingApiKey)?;

    let text = request
        .text
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(OffloadError::MissingText)?;

    let language = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    let system = prompt::system_prompt(language);
    let tool = prompt::create_items_tool();

    let outcome = gateway.complete_with_tool(&system, text, &tool).await?;

    match outcome {
        ChatOutcome::ToolCall { arguments } => parse_arguments(&arguments),
        ChatOutcome::Content(content) => {
            // Model ignored the forced tool choice; still a well-formed
            // result with no items.
            debug!(content_len = content.len(), "no tool call in response, using content fallback");
            Ok(ExtractionResult { items: Vec::new(), response: content })
        }
    }
}

/// Loose envelope for the tool-call arguments: `items` stay untyped so one
/// malformed item cannot sink its well-formed siblings.
#[derive(Deserialize)]
struct RawArguments {
    #[serde(default)]
    items: Vec<serde_json::Value>,
    response: String,
}

/// Parse the tool call's JSON-encoded argument string and validate each
/// item. Items that fail strict deserialization or carry an empty title are
/// dropped and logged; order of the survivors is preserved.
fn parse_arguments(arguments: &str) -> Result<ExtractionResult, OffloadError> {
    let raw: RawArguments = serde_json::from_str(arguments)
        .map_err(|e| OffloadError::MalformedPayload(format!("tool arguments: {e}")))?;

    let mut items = Vec::with_capacity(raw.items.len());
    for (index, value) in raw.items.into_iter().enumerate() {
        match serde_json::from_value::<ExtractedItem>(value) {
            Ok(item) if !item.title.is_empty() => items.push(item),
            Ok(_) => warn!(index, "dropping extracted item with empty title"),
            Err(e) => warn!(index, error = %e, "dropping malformed extracted item"),
        }
    }

    Ok(ExtractionResult { items, response: raw.response })
}
