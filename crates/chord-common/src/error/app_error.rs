//! Application error types
//!
//! Top-level error for the bot binary. Library layers keep their own error enums and are
//! folded in here as strings, so this crate does not depend on the gateway crate.

use crate::config::ConfigError;
use crate::telemetry::TracingError;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TracingError),

    // Gateway session errors (connect, handshake, read, write)
    #[error("Gateway error: {0}")]
    Gateway(String),
}

impl AppError {
    /// Process exit code for this error
    ///
    /// Follows the BSD `sysexits` convention: configuration problems are `EX_CONFIG` (78),
    /// gateway failures are `EX_UNAVAILABLE` (69), tracing setup failures are `EX_SOFTWARE` (70).
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::Gateway(_) => 69,
            Self::Telemetry(_) => 70,
        }
    }

    /// Short machine-readable error code for structured logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Telemetry(_) => "TELEMETRY_ERROR",
            Self::Gateway(_) => "GATEWAY_ERROR",
        }
    }

    /// Create a gateway error from any displayable error
    #[must_use]
    pub fn gateway(err: impl fmt::Display) -> Self {
        Self::Gateway(err.to_string())
    }
}
