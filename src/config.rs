use serde::Deserialize;

/// Explicit runtime configuration. Credentials and collaborator URLs are
/// loaded once at startup and passed into bootstrap, never read from
/// ambient globals after that.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bind_address: String,
    pub facebook_access_token: String,
    pub slack_webhook_url: String,
    pub registry_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Ok(Self {
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            facebook_access_token: require("FACEBOOK_ACCESS_TOKEN")?,
            slack_webhook_url: require("SLACK_WEBHOOK_URL")?,
            registry_url: require("JSON_SERVER_URL")?,
        })
    }
}

fn require(key: &str) -> Result<String, config::ConfigError> {
    std::env::var(key).map_err(|_| config::ConfigError::NotFound(key.to_string()))
}
