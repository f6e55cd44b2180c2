//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `OFFLOAD_BIND` and `OFFLOAD_LOG_LEVEL` env overrides. The
//! gateway API key comes from the `LLM_API_KEY` env var only — never TOML —
//! and its absence is tolerated here: the handler reports it per request so
//! the endpoint still answers pre-flights on a misconfigured deployment.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

/// Chat-completions gateway configuration. Populated from `[gateway]`.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// Fully-resolved service configuration, injected into the router state at
/// startup. Nothing on the request path reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP listener binds to.
    pub bind: String,
    pub log_level: String,
    pub gateway: GatewayConfig,
    /// API key from `LLM_API_KEY` env var — `None` means every offload
    /// request fails with a configuration error until the key is provided.
    pub api_key: Option<String>,
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    gateway: RawGateway,
}

#[derive(Deserialize)]
struct RawServer {
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize)]
struct RawGateway {
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawServer {
    fn default() -> Self {
        Self { bind: default_bind(), log_level: default_log_level() }
    }
}

impl Default for RawGateway {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_bind() -> String { "127.0.0.1:8787".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_api_base_url() -> String { "https://ai.gateway.lovable.dev/v1/chat/completions".to_string() }
fn default_model() -> String { "google/gemini-3-flash-preview".to_string() }
fn default_timeout_seconds() -> u64 { 60 }

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let bind_override = env::var("OFFLOAD_BIND").ok();
    let log_level_override = env::var("OFFLOAD_LOG_LEVEL").ok();
    let api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());
    load_from(
        Path::new("config/default.toml"),
        bind_override.as_deref(),
        log_level_override.as_deref(),
        api_key,
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    bind_override: Option<&str>,
    log_level_override: Option<&str>,
    api_key: Option<String>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let bind = bind_override.unwrap_or(&parsed.server.bind).to_string();
    let log_level = log_level_override.unwrap_or(&parsed.server.log_level).to_string();

    Ok(Config {
        bind,
        log_level,
        gateway: GatewayConfig {
            api_base_url: parsed.gateway.api_base_url,
            model: parsed.gateway.model,
            timeout_seconds: parsed.gateway.timeout_seconds,
        },
        api_key,
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for tests — localhost gateway, dummy key, 1 s timeout.
impl Config {
    pub fn test_default() -> Self {
        Self {
            bind: default_bind(),
            log_level: "info".into(),
            gateway: GatewayConfig {
                api_base_url: "http://127.0.0.1:0/v1/chat/completions".into(),
                model: "test-model".into(),
                timeout_seconds: 1,
            },
            api_key: Some("test-key".into()),
        }
    }
}
