use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::adapters::traits::NotificationSink;
use crate::error::{AppError, AppResult};

/// Slack incoming-webhook notification sink
pub struct SlackWebhookSink {
    client: reqwest::Client,
    webhook_url: String,
}

#[derive(Debug, Serialize)]
struct SlackMessage<'a> {
    text: &'a str,
}

impl SlackWebhookSink {
    pub fn new(client: reqwest::Client, webhook_url: String) -> Self {
        Self {
            client,
            webhook_url,
        }
    }
}

#[async_trait]
impl NotificationSink for SlackWebhookSink {
    async fn deliver(&self, text: &str) -> AppResult<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&SlackMessage { text })
            .send()
            .await
            .map_err(|e| AppError::NotificationFailure(format!("Slack webhook: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::NotificationFailure(format!(
                "Slack webhook returned {}",
                status
            )));
        }

        info!("Slack notification delivered");
        Ok(())
    }
}
