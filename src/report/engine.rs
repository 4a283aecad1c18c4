use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::adapters::traits::{AdPlatform, CampaignRegistry, NotificationSink};
use crate::error::AppResult;
use crate::pacing::{aggregate, calculator, reconcile};
use crate::report::models::SpendReport;
use crate::report::synthesizer::{self, AccountFindings};

/// Drives one report-generation request: registry snapshot, per-campaign
/// spend fetch + pacing, per-account reconciliation, synthesis, and the
/// optional notification dispatch.
///
/// Each invocation owns its working data; no state persists across
/// requests. Accounts and campaigns are processed in declared order so
/// the output is deterministic.
pub struct ReportEngine {
    platform: Arc<dyn AdPlatform>,
    registry: Arc<dyn CampaignRegistry>,
    sink: Arc<dyn NotificationSink>,
}

impl ReportEngine {
    pub fn new(
        platform: Arc<dyn AdPlatform>,
        registry: Arc<dyn CampaignRegistry>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            platform,
            registry,
            sink,
        }
    }

    /// Generate a report paced against today's date.
    pub async fn generate(&self, notify: bool) -> AppResult<SpendReport> {
        self.generate_as_of(notify, Utc::now().date_naive()).await
    }

    /// Generate a report paced against an explicit "now". Any fetch or
    /// validation failure aborts the whole report; no partial result is
    /// returned.
    pub async fn generate_as_of(&self, notify: bool, now: NaiveDate) -> AppResult<SpendReport> {
        let accounts = self.registry.load_accounts().await?;
        info!("Generating spend report for {} accounts", accounts.len());

        // Declared names are unioned across all accounts: a name tracked
        // under any account is never flagged as undeclared.
        let declared = reconcile::declared_names(&accounts);
        let mut excluded: Vec<String> = declared.iter().cloned().collect();
        excluded.sort();

        let mut findings = Vec::with_capacity(accounts.len());

        for account in &accounts {
            let mut pacing = Vec::with_capacity(account.campaigns.len());

            for campaign in &account.campaigns {
                let insights = self
                    .platform
                    .fetch_campaign_spend(
                        &account.id,
                        &campaign.name,
                        campaign.start_date,
                        campaign.end_date,
                    )
                    .await?;
                let spend = aggregate::total_spend(&insights);

                let result = calculator::pace(
                    &campaign.name,
                    spend,
                    campaign.set_budget,
                    campaign.start_date,
                    campaign.end_date,
                    now,
                )?;
                pacing.push(result);
            }

            // Second reconciliation stage: the query-level exclusion is a
            // substring heuristic, so membership is checked again locally.
            let records = self.platform.fetch_all_spend(&account.id, &excluded).await?;
            let undeclared = reconcile::undeclared_spenders(&declared, records);
            if !undeclared.is_empty() {
                warn!(
                    "Account {}: {} undeclared spender(s) detected",
                    account.name,
                    undeclared.len()
                );
            }

            findings.push(AccountFindings {
                account_name: account.name.clone(),
                pacing,
                undeclared,
            });
        }

        let (entries, message) = synthesizer::synthesize(findings);

        // A failed dispatch never discards the computed report.
        let mut notification_warning = None;
        if notify {
            match self.sink.deliver(&message).await {
                Ok(()) => info!("Report notification delivered"),
                Err(e) => {
                    warn!("Report notification failed: {}", e);
                    notification_warning = Some(e.to_string());
                }
            }
        }

        Ok(SpendReport {
            entries,
            message,
            notification_warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::report::models::{
        Account, Campaign, InsightRecord, ReportEntry, SpendRecord,
    };
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june_campaign(name: &str, budget: Decimal) -> Campaign {
        Campaign {
            name: name.to_string(),
            start_date: date(2024, 6, 1),
            end_date: date(2024, 6, 30),
            set_budget: budget,
        }
    }

    struct MockPlatform {
        /// campaign name -> insight spends
        insights: HashMap<String, Vec<Decimal>>,
        /// account id -> account-wide spend rows
        all_spend: HashMap<String, Vec<SpendRecord>>,
        /// fail every call after this many successful ones
        fail_after: Option<usize>,
        calls: AtomicUsize,
    }

    impl MockPlatform {
        fn new() -> Self {
            Self {
                insights: HashMap::new(),
                all_spend: HashMap::new(),
                fail_after: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn check_failure(&self) -> AppResult<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(limit) = self.fail_after {
                if call >= limit {
                    return Err(AppError::UpstreamUnavailable(
                        "connection reset".to_string(),
                    ));
                }
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AdPlatform for MockPlatform {
        async fn fetch_campaign_spend(
            &self,
            _account_id: &str,
            name_filter: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> AppResult<Vec<InsightRecord>> {
            self.check_failure()?;
            Ok(self
                .insights
                .get(name_filter)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|spend| InsightRecord { spend })
                .collect())
        }

        async fn fetch_all_spend(
            &self,
            account_id: &str,
            _excluded_names: &[String],
        ) -> AppResult<Vec<SpendRecord>> {
            self.check_failure()?;
            Ok(self.all_spend.get(account_id).cloned().unwrap_or_default())
        }
    }

    struct MockRegistry {
        accounts: Vec<Account>,
    }

    #[async_trait]
    impl CampaignRegistry for MockRegistry {
        async fn load_accounts(&self) -> AppResult<Vec<Account>> {
            Ok(self.accounts.clone())
        }

        async fn store_accounts(&self, _accounts: &[Account]) -> AppResult<()> {
            Ok(())
        }
    }

    struct MockSink {
        delivered: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MockSink {
        fn new(fail: bool) -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl NotificationSink for MockSink {
        async fn deliver(&self, text: &str) -> AppResult<()> {
            if self.fail {
                return Err(AppError::NotificationFailure("webhook 500".to_string()));
            }
            self.delivered.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn engine(
        platform: MockPlatform,
        accounts: Vec<Account>,
        sink_fails: bool,
    ) -> (ReportEngine, Arc<MockSink>) {
        let sink = Arc::new(MockSink::new(sink_fails));
        let engine = ReportEngine::new(
            Arc::new(platform),
            Arc::new(MockRegistry { accounts }),
            sink.clone(),
        );
        (engine, sink)
    }

    #[tokio::test]
    async fn test_full_report_paces_and_reconciles() {
        let mut platform = MockPlatform::new();
        platform
            .insights
            .insert("Summer Sale".to_string(), vec![dec!(700), dec!(500)]);
        platform.all_spend.insert(
            "acct-1".to_string(),
            vec![SpendRecord {
                campaign_name: "Flash Promo".to_string(),
                campaign_id: "999".to_string(),
                spend: dec!(80),
            }],
        );

        let accounts = vec![Account {
            id: "acct-1".to_string(),
            name: "Acme".to_string(),
            campaigns: vec![june_campaign("Summer Sale", dec!(3000))],
        }];

        let (engine, sink) = engine(platform, accounts, false);
        let report = engine
            .generate_as_of(true, date(2024, 6, 15))
            .await
            .unwrap();

        assert_eq!(report.entries.len(), 2);
        match &report.entries[0] {
            ReportEntry::Account(block) => {
                assert_eq!(block.account_name, "Acme");
                let result = &block.campaigns[0];
                assert_eq!(result.spend, dec!(1200));
                assert_eq!(result.expected_spend, dec!(1500));
                assert_eq!(result.offset_amount, dec!(-300));
                assert!(result.on_track);
                assert_eq!(result.suggested_daily_budget, dec!(120));
            }
            other => panic!("expected account block, got {:?}", other),
        }
        match &report.entries[1] {
            ReportEntry::Undeclared(undeclared) => {
                assert_eq!(undeclared.name, "Flash Promo");
                assert!(undeclared.should_not_be_spending);
            }
            other => panic!("expected undeclared entry, got {:?}", other),
        }

        assert!(report.notification_warning.is_none());
        assert!(report.message.starts_with("*Facebook Ads Spend Report*"));
        let delivered = sink.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0], report.message);
    }

    #[tokio::test]
    async fn test_declared_under_other_account_not_flagged() {
        let mut platform = MockPlatform::new();
        // Account B's all-spend includes a name declared under account A.
        platform.all_spend.insert(
            "acct-b".to_string(),
            vec![
                SpendRecord {
                    campaign_name: "Summer Sale".to_string(),
                    campaign_id: "1".to_string(),
                    spend: dec!(500),
                },
                SpendRecord {
                    campaign_name: "Flash Promo".to_string(),
                    campaign_id: "2".to_string(),
                    spend: dec!(80),
                },
            ],
        );

        let accounts = vec![
            Account {
                id: "acct-a".to_string(),
                name: "A".to_string(),
                campaigns: vec![june_campaign("Summer Sale", dec!(3000))],
            },
            Account {
                id: "acct-b".to_string(),
                name: "B".to_string(),
                campaigns: vec![],
            },
        ];

        let (engine, _) = engine(platform, accounts, false);
        let report = engine
            .generate_as_of(false, date(2024, 6, 15))
            .await
            .unwrap();

        let flagged: Vec<_> = report
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ReportEntry::Undeclared(u) => Some(u.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(flagged, vec!["Flash Promo"]);
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_whole_report() {
        let mut platform = MockPlatform::new();
        platform.fail_after = Some(3);

        let accounts = (1..=3)
            .map(|i| Account {
                id: format!("acct-{}", i),
                name: format!("Account {}", i),
                campaigns: vec![june_campaign(&format!("Campaign {}", i), dec!(1000))],
            })
            .collect();

        let (engine, sink) = engine(platform, accounts, false);
        let result = engine.generate_as_of(true, date(2024, 6, 15)).await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
        assert!(sink.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_report() {
        let platform = MockPlatform::new();
        let accounts = vec![Account {
            id: "acct-1".to_string(),
            name: "Acme".to_string(),
            campaigns: vec![june_campaign("Summer Sale", dec!(3000))],
        }];

        let (engine, _) = engine(platform, accounts, true);
        let report = engine
            .generate_as_of(true, date(2024, 6, 15))
            .await
            .unwrap();

        assert_eq!(report.entries.len(), 1);
        assert!(report.notification_warning.is_some());
    }

    #[tokio::test]
    async fn test_sink_untouched_when_notify_off() {
        let platform = MockPlatform::new();
        let accounts = vec![Account {
            id: "acct-1".to_string(),
            name: "Acme".to_string(),
            campaigns: vec![],
        }];

        // A failing sink would error if invoked.
        let (engine, sink) = engine(platform, accounts, false);
        let report = engine
            .generate_as_of(false, date(2024, 6, 15))
            .await
            .unwrap();

        assert!(report.notification_warning.is_none());
        assert!(sink.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_registry_period_fails_loudly() {
        let platform = MockPlatform::new();
        let accounts = vec![Account {
            id: "acct-1".to_string(),
            name: "Acme".to_string(),
            campaigns: vec![Campaign {
                name: "Backwards".to_string(),
                start_date: date(2024, 6, 30),
                end_date: date(2024, 6, 1),
                set_budget: dec!(100),
            }],
        }];

        let (engine, _) = engine(platform, accounts, false);
        let result = engine.generate_as_of(false, date(2024, 6, 15)).await;

        assert!(matches!(result, Err(AppError::InvalidRange { .. })));
    }
}
