//! MindFlow offload service — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at the configured level
//!   4. Spawn Ctrl-C → shutdown signal watcher
//!   5. Run the axum server until cancelled

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mindflow_offload::{config, error, logger, server};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), error::AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;

    logger::init(&config.log_level)?;

    info!(
        bind = %config.bind,
        log_level = %config.log_level,
        "config loaded"
    );
    if config.api_key.is_none() {
        warn!("LLM_API_KEY is not set; offload requests will fail until it is configured");
    }

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            signal_token.cancel();
        }
    });

    server::run(&config, shutdown).await
}
