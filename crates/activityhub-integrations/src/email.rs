//! Email sender implementations.

use async_trait::async_trait;
use tracing::info;

use activityhub_core::result::AppResult;
use activityhub_core::traits::{EmailMessage, EmailSender};

use crate::client::IntegrationClient;

/// Sends mail through a remote email API.
#[derive(Debug, Clone)]
pub struct HttpEmailSender {
    client: IntegrationClient,
}

impl HttpEmailSender {
    /// Wrap a configured client.
    pub fn new(client: IntegrationClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        self.client.post("messages", message).await
    }
}

/// Logs outgoing mail instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LoggingEmailSender;

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        info!(to = %message.to, subject = %message.subject, "Email sent (logging sender)");
        Ok(())
    }
}
