//! Application-wide error types for startup and infrastructure.
//!
//! Request-path failures have their own taxonomy in [`crate::offload`];
//! `AppError` covers everything that can go wrong before or around serving.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
