use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::debug;

use crate::adapters::traits::AdPlatform;
use crate::error::{AppError, AppResult};
use crate::report::models::{InsightRecord, SpendRecord};

const GRAPH_API_VERSION: &str = "v17.0";

/// Meta Graph API client for campaign insight queries
pub struct FacebookAdsClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

// ========== WIRE MODELS ==========

#[derive(Debug, Deserialize)]
struct GraphListResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CampaignNode {
    #[allow(dead_code)]
    name: Option<String>,
    insights: Option<InsightsEnvelope>,
}

#[derive(Debug, Deserialize)]
struct InsightsEnvelope {
    data: Vec<InsightNode>,
}

#[derive(Debug, Deserialize)]
struct InsightNode {
    spend: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccountInsightNode {
    campaign_name: String,
    campaign_id: String,
    spend: Option<String>,
}

impl FacebookAdsClient {
    pub fn new(client: reqwest::Client, access_token: String) -> Self {
        Self::with_base_url(
            client,
            access_token,
            format!("https://graph.facebook.com/{}", GRAPH_API_VERSION),
        )
    }

    /// Point the client at an alternate Graph endpoint (test stubs).
    pub fn with_base_url(
        client: reqwest::Client,
        access_token: String,
        base_url: String,
    ) -> Self {
        Self {
            client,
            base_url,
            access_token,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!(
                "Graph API returned {}: {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::MalformedUpstreamData(format!("Graph API payload: {}", e)))
    }
}

/// Projection that asks the Graph API to attach windowed spend insights
/// to each matched campaign.
fn insights_field(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        r#"name,insights.time_range({{"since":"{}","until":"{}"}}){{spend}}"#,
        start, end
    )
}

/// Query-level CONTAIN filter on the campaign name
fn contain_filter(name: &str) -> String {
    json!([{"field": "campaign.name", "operator": "CONTAIN", "value": name}]).to_string()
}

/// One NOT_CONTAIN clause per declared name. This is a best-effort
/// payload shrink; the engine re-checks membership after the fetch.
fn not_contain_filters(names: &[String]) -> String {
    let clauses: Vec<_> = names
        .iter()
        .map(|name| json!({"field": "campaign.name", "operator": "NOT_CONTAIN", "value": name}))
        .collect();
    serde_json::Value::Array(clauses).to_string()
}

fn parse_spend(raw: Option<&str>, context: &str) -> AppResult<Decimal> {
    match raw {
        // Absent spend on an insight row means nothing was spent.
        None => Ok(Decimal::ZERO),
        Some(s) => Decimal::from_str(s).map_err(|e| {
            AppError::MalformedUpstreamData(format!("unparseable spend for {}: {}", context, e))
        }),
    }
}

#[async_trait]
impl AdPlatform for FacebookAdsClient {
    async fn fetch_campaign_spend(
        &self,
        account_id: &str,
        name_filter: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<InsightRecord>> {
        let url = format!("{}/act_{}/campaigns", self.base_url, account_id);
        let params = [
            ("fields", insights_field(start, end)),
            ("filtering", contain_filter(name_filter)),
            ("access_token", self.access_token.clone()),
        ];

        debug!("Fetching campaign spend: act_{} / {}", account_id, name_filter);
        let response: GraphListResponse<CampaignNode> = self.get_json(&url, &params).await?;

        let mut records = Vec::new();
        for campaign in response.data {
            let insights = campaign.insights.map(|i| i.data).unwrap_or_default();
            for insight in insights {
                let spend = parse_spend(insight.spend.as_deref(), name_filter)?;
                records.push(InsightRecord { spend });
            }
        }
        Ok(records)
    }

    async fn fetch_all_spend(
        &self,
        account_id: &str,
        excluded_names: &[String],
    ) -> AppResult<Vec<SpendRecord>> {
        let url = format!("{}/act_{}/insights", self.base_url, account_id);
        let params = [
            ("fields", "campaign_name,campaign_id,spend".to_string()),
            ("level", "campaign".to_string()),
            ("date_preset", "this_month".to_string()),
            ("filtering", not_contain_filters(excluded_names)),
            ("access_token", self.access_token.clone()),
        ];

        debug!("Fetching account-wide spend: act_{}", account_id);
        let response: GraphListResponse<AccountInsightNode> = self.get_json(&url, &params).await?;

        response
            .data
            .into_iter()
            .map(|node| {
                // A campaign-level row without a spend figure is garbled
                // data, not a zero; abort rather than under-report.
                let raw = node.spend.as_deref().ok_or_else(|| {
                    AppError::MalformedUpstreamData(format!(
                        "missing spend for campaign {}",
                        node.campaign_name
                    ))
                })?;
                let spend = parse_spend(Some(raw), &node.campaign_name)?;
                Ok(SpendRecord {
                    campaign_name: node.campaign_name,
                    campaign_id: node.campaign_id,
                    spend,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insights_field_embeds_window() {
        let field = insights_field(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );
        assert_eq!(
            field,
            r#"name,insights.time_range({"since":"2024-06-01","until":"2024-06-30"}){spend}"#
        );
    }

    #[test]
    fn test_contain_filter_shape() {
        let filter: serde_json::Value =
            serde_json::from_str(&contain_filter("Summer Sale")).unwrap();
        assert_eq!(filter[0]["operator"], "CONTAIN");
        assert_eq!(filter[0]["value"], "Summer Sale");
    }

    #[test]
    fn test_not_contain_one_clause_per_name() {
        let names = vec!["Summer Sale".to_string(), "Winter Push".to_string()];
        let filter: serde_json::Value =
            serde_json::from_str(&not_contain_filters(&names)).unwrap();
        assert_eq!(filter.as_array().unwrap().len(), 2);
        assert_eq!(filter[0]["operator"], "NOT_CONTAIN");
        assert_eq!(filter[1]["value"], "Winter Push");
    }

    #[test]
    fn test_absent_insight_spend_is_zero() {
        assert_eq!(parse_spend(None, "x").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_garbage_spend_is_malformed() {
        let result = parse_spend(Some("not-a-number"), "x");
        assert!(matches!(result, Err(AppError::MalformedUpstreamData(_))));
    }

    #[test]
    fn test_campaign_payload_parses() {
        let payload = r#"{
            "data": [
                {
                    "name": "Summer Sale 2024",
                    "insights": {"data": [{"spend": "700.00"}, {"spend": "500.00"}]}
                },
                {"name": "Summer Sale Retarget", "insights": null}
            ]
        }"#;
        let parsed: GraphListResponse<CampaignNode> = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert!(parsed.data[1].insights.is_none());
    }
}
