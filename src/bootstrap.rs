use std::sync::Arc;

use tracing::info;

use crate::adapters::{
    facebook::FacebookAdsClient, registry::JsonRegistryClient, slack::SlackWebhookSink,
    traits::CampaignRegistry,
};
use crate::api::handlers::AppState;
use crate::config::Config;
use crate::report::engine::ReportEngine;

/// Wire the collaborator adapters and the report engine into the shared
/// application state. One reqwest client is shared across adapters.
pub fn initialize_app_state(config: &Config) -> AppState {
    info!("Initializing application components ...");

    let http = reqwest::Client::new();

    let platform = Arc::new(FacebookAdsClient::new(
        http.clone(),
        config.facebook_access_token.clone(),
    ));
    info!("✅ Facebook Ads client initialized");

    let registry: Arc<dyn CampaignRegistry> = Arc::new(JsonRegistryClient::new(
        http.clone(),
        config.registry_url.clone(),
    ));
    info!("✅ Campaign registry client initialized: {}", config.registry_url);

    let sink = Arc::new(SlackWebhookSink::new(http, config.slack_webhook_url.clone()));
    info!("✅ Slack webhook sink initialized");

    let report_engine = Arc::new(ReportEngine::new(platform, registry.clone(), sink));
    info!("✅ Report engine initialized");

    AppState {
        report_engine,
        registry,
    }
}
