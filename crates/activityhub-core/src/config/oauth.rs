//! Optional social-login (OAuth) configuration.
//!
//! Missing OAuth settings never stop the server; they only disable the
//! corresponding login provider and produce a startup warning.

use serde::{Deserialize, Serialize};

/// OAuth client credentials for a single identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OAuthClientConfig {
    /// OAuth client ID.
    #[serde(default)]
    pub client_id: Option<String>,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl OAuthClientConfig {
    /// Whether both the client ID and secret are present.
    pub fn is_configured(&self) -> bool {
        has_value(&self.client_id) && has_value(&self.client_secret)
    }

    /// Return a warning describing what is missing, if anything.
    pub fn warning(&self, provider: &str) -> Option<String> {
        match (has_value(&self.client_id), has_value(&self.client_secret)) {
            (true, true) => None,
            (false, false) => Some(format!(
                "{provider} OAuth is not configured; {provider} login is disabled"
            )),
            (true, false) => Some(format!(
                "oauth.{} client_secret is missing; {provider} login is disabled",
                provider.to_lowercase()
            )),
            (false, true) => Some(format!(
                "oauth.{} client_id is missing; {provider} login is disabled",
                provider.to_lowercase()
            )),
        }
    }
}

/// Social login providers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OAuthConfig {
    /// Google sign-in.
    #[serde(default)]
    pub google: OAuthClientConfig,
    /// Facebook sign-in.
    #[serde(default)]
    pub facebook: OAuthClientConfig,
}

impl OAuthConfig {
    /// Collect warnings for every provider that is not fully configured.
    pub fn warnings(&self) -> Vec<String> {
        [
            self.google.warning("Google"),
            self.facebook.warning("Facebook"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn has_value(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| !v.trim().is_empty())
}
