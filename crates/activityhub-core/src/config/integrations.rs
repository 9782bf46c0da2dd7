//! Outbound collaborator endpoints.

use serde::{Deserialize, Serialize};

/// Connection settings for one outbound HTTP collaborator.
///
/// An empty `base_url` selects the logging implementation, which records the
/// call and succeeds without leaving the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the remote service.
    #[serde(default)]
    pub base_url: String,
    /// Bearer API key sent with each request.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl EndpointConfig {
    /// Whether a remote endpoint is configured.
    pub fn is_remote(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

/// All outbound collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntegrationsConfig {
    /// Payment gateway.
    #[serde(default)]
    pub payment: EndpointConfig,
    /// Transactional email sender.
    #[serde(default)]
    pub email: EndpointConfig,
    /// Loyalty points service.
    #[serde(default)]
    pub loyalty: EndpointConfig,
    /// Analytics event sink.
    #[serde(default)]
    pub analytics: EndpointConfig,
    /// Gift card validation service.
    #[serde(default)]
    pub gift_card: EndpointConfig,
}

fn default_timeout() -> u64 {
    10
}
