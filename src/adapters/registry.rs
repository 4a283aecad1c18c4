use async_trait::async_trait;
use tracing::debug;

use crate::adapters::traits::CampaignRegistry;
use crate::error::{AppError, AppResult};
use crate::report::models::Account;

/// Campaign registry backed by a json-server style endpoint: the whole
/// account list is fetched with GET and replaced with PUT.
pub struct JsonRegistryClient {
    client: reqwest::Client,
    url: String,
}

impl JsonRegistryClient {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl CampaignRegistry for JsonRegistryClient {
    async fn load_accounts(&self) -> AppResult<Vec<Account>> {
        debug!("Loading campaign registry from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "registry returned {}",
                status
            )));
        }

        response
            .json::<Vec<Account>>()
            .await
            .map_err(|e| AppError::MalformedUpstreamData(format!("registry payload: {}", e)))
    }

    async fn store_accounts(&self, accounts: &[Account]) -> AppResult<()> {
        debug!("Storing {} accounts to registry", accounts.len());
        let response = self.client.put(&self.url).json(accounts).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "registry update returned {}",
                status
            )));
        }
        Ok(())
    }
}
