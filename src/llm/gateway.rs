//! OpenAI-compatible chat completion client (`/v1/chat/completions`).
//!
//! All wire types are private to this module — callers see only
//! [`ToolSpec`], [`ChatOutcome`] and [`GatewayError`]. The client forces a
//! tool invocation via `tool_choice`, but the model can still deviate, so
//! the free-text arm of [`ChatOutcome`] is a normal (non-error) result.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::config::GatewayConfig;
use crate::llm::{ChatOutcome, GatewayError, ToolSpec};

// ── Public client ─────────────────────────────────────────────────────────────

/// Adapter for any HTTP endpoint implementing `/v1/chat/completions`.
///
/// Constructed once at startup from the injected [`GatewayConfig`], then
/// cheaply cloned because `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    api_base_url: String,
    model: String,
    api_key: String,
}

impl GatewayClient {
    /// Build a client from config values and the bearer credential.
    ///
    /// Callers must resolve the credential before constructing the client;
    /// a request is never attempted without one.
    pub fn new(config: &GatewayConfig, api_key: String) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// One completion round trip: system + user message, a single tool the
    /// model is forced to call.
    ///
    /// Returns the first tool call's raw argument string, or the assistant's
    /// free-text content when the model ignored the forced tool choice.
    pub async fn complete_with_tool(
        &self,
        system: &str,
        user: &str,
        tool: &ToolSpec,
    ) -> Result<ChatOutcome, GatewayError> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message { role: "system".to_string(), content: system.to_string() },
                Message { role: "user".to_string(), content: user.to_string() },
            ],
            tools: vec![Tool {
                kind: "function".to_string(),
                function: FunctionDef {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    parameters: tool.parameters.clone(),
                },
            }],
            tool_choice: ToolChoice {
                kind: "function".to_string(),
                function: FunctionName { name: tool.name.clone() },
            },
        };

        debug!(
            model = %payload.model,
            tool = %tool.name,
            user_len = user.len(),
            "sending gateway request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full gateway request payload");
        }

        let response = self
            .client
            .post(&self.api_base_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.api_base_url, error = %e, "gateway HTTP request failed (transport)");
                GatewayError::Transport(e.to_string())
            })?;

        let response = check_status(response).await?;

        let parsed = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize gateway response");
            GatewayError::MalformedPayload(format!("failed to parse response body: {e}"))
        })?;

        debug!(choices = parsed.choices.len(), "received gateway response");

        let message = parsed.choices.into_iter().next().map(|c| c.message);

        if let Some(call) = message
            .as_ref()
            .and_then(|m| m.tool_calls.as_ref())
            .and_then(|calls| calls.first())
        {
            return Ok(ChatOutcome::ToolCall { arguments: call.function.arguments.clone() });
        }

        let content = message.and_then(|m| m.content).unwrap_or_default();
        Ok(ChatOutcome::Content(content))
    }
}

/// Classify the response status before touching the body. 429 and 402 map
/// to their own kinds; every other failure status is logged (with body) and
/// collapsed into an opaque `Upstream` error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => Err(GatewayError::RateLimited),
        402 => Err(GatewayError::QuotaExhausted),
        code => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            error!(%status, %body, "gateway returned HTTP error");
            Err(GatewayError::Upstream { status: code })
        }
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    kind: String,
    function: FunctionDef,
}

#[derive(Debug, Serialize)]
struct FunctionDef {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    kind: String,
    function: FunctionName,
}

#[derive(Debug, Serialize)]
struct FunctionName {
    name: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    tools: Vec<Tool>,
    tool_choice: ToolChoice,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    function: WireFunctionCall,
}

#[derive(Debug, Deserialize)]
struct WireFunctionCall {
    arguments: String,
}
