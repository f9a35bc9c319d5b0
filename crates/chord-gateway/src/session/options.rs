//! Session connection options

use crate::protocol::{IdentifyPayload, IdentifyProperties};
use chord_common::DiscordConfig;
use chord_core::Intents;
use std::fmt;

/// Everything needed to open and identify a session
#[derive(Clone)]
pub struct SessionOptions {
    /// Gateway endpoint, including the `v` and `encoding` query parameters
    pub gateway_url: String,
    /// Bot token sent in Identify
    pub token: String,
    /// Event categories to subscribe to
    pub intents: Intents,
    /// Connection properties sent in Identify
    pub properties: IdentifyProperties,
}

impl SessionOptions {
    /// Default gateway endpoint (API v10, JSON encoding)
    pub const DEFAULT_GATEWAY_URL: &'static str = "wss://gateway.discord.gg/?v=10&encoding=json";

    #[must_use]
    pub fn new(token: impl Into<String>, intents: Intents) -> Self {
        Self {
            gateway_url: Self::DEFAULT_GATEWAY_URL.to_string(),
            token: token.into(),
            intents,
            properties: IdentifyProperties::new(),
        }
    }

    /// Options taken from the loaded configuration
    #[must_use]
    pub fn from_config(config: &DiscordConfig) -> Self {
        Self::new(config.token.clone(), config.intents).with_gateway_url(config.gateway_url.clone())
    }

    #[must_use]
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: IdentifyProperties) -> Self {
        self.properties = properties;
        self
    }

    pub(crate) fn identify_payload(&self) -> IdentifyPayload {
        IdentifyPayload::new(self.token.clone(), self.intents, self.properties.clone())
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("gateway_url", &self.gateway_url)
            .field("token", &"<redacted>")
            .field("intents", &self.intents)
            .field("properties", &self.properties)
            .finish()
    }
}
