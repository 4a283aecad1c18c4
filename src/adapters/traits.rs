use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppResult;
use crate::report::models::{Account, InsightRecord, SpendRecord};

/// Ad platform query capability consumed by the report engine.
///
/// Transport, auth, and retry policy live behind this seam; failures
/// surface as `UpstreamUnavailable` and abort the report in progress.
#[async_trait]
pub trait AdPlatform: Send + Sync {
    /// Spend for campaigns matching `name_filter` (substring match on
    /// the platform side) within the inclusive date window.
    async fn fetch_campaign_spend(
        &self,
        account_id: &str,
        name_filter: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<InsightRecord>>;

    /// All campaign-level spend for the current month, excluding names
    /// matching any of `excluded_names`. The exclusion is a best-effort
    /// substring filter applied at the source to shrink the payload;
    /// callers must still re-check membership locally.
    async fn fetch_all_spend(
        &self,
        account_id: &str,
        excluded_names: &[String],
    ) -> AppResult<Vec<SpendRecord>>;
}

/// Declared-campaign registry, read once per report as an immutable
/// snapshot.
#[async_trait]
pub trait CampaignRegistry: Send + Sync {
    async fn load_accounts(&self) -> AppResult<Vec<Account>>;

    async fn store_accounts(&self, accounts: &[Account]) -> AppResult<()>;
}

/// Optional notification delivery target for the composed report text
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, text: &str) -> AppResult<()>;
}
