//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use chord_core::Intents;
use std::env;
use std::fmt;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub discord: DiscordConfig,
    pub bot: BotConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
    pub log_format: LogFormat,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn default_for(env: Environment) -> Self {
        if env.is_production() {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Gateway and REST connection settings
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token, sent in Identify and as `Authorization: Bot <token>`
    pub token: String,
    pub gateway_url: String,
    pub api_base: String,
    pub intents: Intents,
}

// Keep the token out of logs
impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .field("gateway_url", &self.gateway_url)
            .field("api_base", &self.api_base)
            .field("intents", &self.intents)
            .finish()
    }
}

/// Text-command bot settings
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub command_prefix: String,
}

// Default value functions
fn default_app_name() -> String {
    "chord-bot".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_intents() -> Intents {
    Intents::MUSIC_BOT
}

fn default_command_prefix() -> String {
    "-".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `DISCORD_TOKEN` is missing or a variable holds an invalid value
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env = match var("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => {
                LogFormat::parse(&raw).ok_or_else(|| ConfigError::InvalidValue("LOG_FORMAT", raw))?
            }
            None => LogFormat::default_for(env),
        };

        let intents = match var("DISCORD_INTENTS") {
            Some(raw) => Intents::parse(&raw)
                .map_err(|e| ConfigError::InvalidValue("DISCORD_INTENTS", e.to_string()))?,
            None => default_intents(),
        };

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env,
                log_format,
            },
            discord: DiscordConfig {
                token: var("DISCORD_TOKEN").ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?,
                gateway_url: var("DISCORD_GATEWAY_URL").unwrap_or_else(default_gateway_url),
                api_base: var("DISCORD_API_BASE")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_api_base),
                intents,
            },
            bot: BotConfig {
                command_prefix: var("BOT_COMMAND_PREFIX").unwrap_or_else(default_command_prefix),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
