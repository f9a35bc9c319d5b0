//! Discord REST client

use super::RestError;
use chord_common::DiscordConfig;
use chord_core::Snowflake;
use serde::Serialize;
use std::fmt;

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Minimal Discord REST client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl RestClient {
    /// Default REST base URL (API v10)
    pub const DEFAULT_API_BASE: &'static str = "https://discord.com/api/v10";

    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, Self::DEFAULT_API_BASE)
    }

    /// Client for a non-default base URL (trailing slashes are ignored)
    #[must_use]
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &DiscordConfig) -> Self {
        Self::with_api_base(config.token.clone(), config.api_base.clone())
    }

    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn messages_url(&self, channel_id: Snowflake) -> String {
        format!("{}/channels/{}/messages", self.api_base, channel_id)
    }

    /// Post a text message to a channel
    pub async fn send_message(&self, channel_id: Snowflake, content: &str) -> Result<(), RestError> {
        let response = self
            .http
            .post(self.messages_url(channel_id))
            .header("Authorization", format!("Bot {}", self.token))
            .json(&CreateMessage { content })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                channel_id = %channel_id,
                status = status.as_u16(),
                "Message rejected by API"
            );
            return Err(RestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(channel_id = %channel_id, "Message sent");
        Ok(())
    }
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}
