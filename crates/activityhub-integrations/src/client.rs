//! Shared JSON-over-HTTP client for outbound collaborators.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use activityhub_core::config::EndpointConfig;
use activityhub_core::error::{AppError, ErrorKind};
use activityhub_core::result::AppResult;

/// POSTs JSON to one collaborator's endpoint.
#[derive(Clone)]
pub struct IntegrationClient {
    /// Collaborator name used in logs and errors.
    name: &'static str,
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for IntegrationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationClient")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl IntegrationClient {
    /// Build a client for the given endpoint.
    pub fn new(name: &'static str, config: &EndpointConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build {name} HTTP client"),
                    e,
                )
            })?;

        Ok(Self {
            name,
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    /// Absolute URL for a path under the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST `body` and ignore the response body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<()> {
        self.send(path, body).await.map(|_| ())
    }

    /// POST `body` and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(path, body).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Invalid response from {} service", self.name),
                e,
            )
        })
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<reqwest::Response> {
        let url = self.url(path);
        debug!(service = self.name, %url, "Calling collaborator");

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            warn!(service = self.name, %url, error = %e, "Collaborator unreachable");
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("The {} service is unavailable", self.name),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(service = self.name, %url, %status, body = %text, "Collaborator returned an error");
            return Err(AppError::external_service(format!(
                "The {} service rejected the request ({status})",
                self.name
            )));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = IntegrationClient::new(
            "payment",
            &EndpointConfig {
                base_url: "https://pay.example.com/v1/".into(),
                ..Default::default()
            },
        )
        .expect("client");
        assert_eq!(client.url("/charges"), "https://pay.example.com/v1/charges");
    }
}
