//! Subscriber setup for the bot process

use crate::config::{AppSettings, LogFormat};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Crates that log every frame and request at debug level
const NOISY_DEPENDENCIES: &[&str] = &["tungstenite", "tokio_tungstenite", "hyper", "reqwest"];

/// How log lines are filtered and rendered
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for this workspace's crates when `RUST_LOG` is unset
    pub level: Level,
    /// One JSON object per line instead of human-readable output
    pub json: bool,
    /// Source file and line on each event
    pub file_line: bool,
    /// Let WebSocket and HTTP internals log at `level` too
    pub verbose_dependencies: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            file_line: false,
            verbose_dependencies: false,
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            file_line: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn production() -> Self {
        Self {
            json: true,
            ..Self::default()
        }
    }

    /// Configuration matching the application settings
    ///
    /// The environment chooses the level, `LOG_FORMAT` has the final say on the output format.
    #[must_use]
    pub fn for_app(settings: &AppSettings) -> Self {
        let base = if settings.env.is_development() {
            Self::development()
        } else {
            Self::production()
        };
        Self {
            json: settings.log_format == LogFormat::Json,
            ..base
        }
    }

    /// Filter directive used when `RUST_LOG` is not set
    #[must_use]
    pub fn default_directive(&self) -> String {
        let level = self.level.as_str().to_ascii_lowercase();
        if self.verbose_dependencies {
            return level;
        }

        let mut directive = level;
        for target in NOISY_DEPENDENCIES {
            directive.push_str(&format!(",{target}=warn"));
        }
        directive
    }
}

/// Install the global subscriber with [`TracingConfig::default`]
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(&TracingConfig::default())
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. Fails if a subscriber is already installed.
pub fn try_init_tracing_with_config(config: &TracingConfig) -> Result<(), TracingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let output = fmt::layer()
        .with_file(config.file_line)
        .with_line_number(config.file_line);
    let output = if config.json {
        output.json().boxed()
    } else {
        output.boxed()
    };

    tracing_subscriber::registry()
        .with(output.with_filter(filter))
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
