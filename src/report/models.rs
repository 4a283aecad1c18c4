use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ========== REGISTRY MODELS ==========

/// One tracked ad account with its declared campaigns, as stored in the
/// campaign registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Platform-specific ad account id (without the `act_` prefix)
    pub id: String,
    pub name: String,
    pub campaigns: Vec<Campaign>,
}

/// A declared campaign: budget and the inclusive date window it is meant
/// to be spent over. The name doubles as the fuzzy match key against
/// platform data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub set_budget: Decimal,
}

// ========== PLATFORM MODELS ==========

/// A spend figure for one sub-window of a campaign-window query. The
/// platform may split a query into several of these; they must be summed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightRecord {
    pub spend: Decimal,
}

/// Account-wide spend row for the current period, one per campaign that
/// spent money this month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendRecord {
    pub campaign_name: String,
    pub campaign_id: String,
    pub spend: Decimal,
}

// ========== REPORT MODELS ==========

/// Pacing verdict for one declared campaign
#[derive(Debug, Clone, Serialize)]
pub struct PacingResult {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub set_budget: Decimal,
    pub daily_budget: Decimal,
    pub spend: Decimal,
    pub expected_spend: Decimal,
    pub offset_amount: Decimal,
    pub on_track: bool,
    pub suggested_daily_budget: Decimal,
}

/// Spend recorded under a campaign name that is not in the registry
#[derive(Debug, Clone, Serialize)]
pub struct UndeclaredSpend {
    pub name: String,
    pub spend: Decimal,
    pub should_not_be_spending: bool,
}

/// Per-account block of campaign pacing results
#[derive(Debug, Clone, Serialize)]
pub struct AccountReport {
    pub account_name: String,
    pub campaigns: Vec<PacingResult>,
}

/// One entry of the structured report: either an account's pacing block
/// or a flat undeclared-spend finding.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Account(AccountReport),
    Undeclared(UndeclaredSpend),
}

/// The full outcome of one report-generation request
#[derive(Debug, Clone)]
pub struct SpendReport {
    pub entries: Vec<ReportEntry>,
    pub message: String,
    /// Set when the optional notification dispatch failed; never
    /// invalidates the computed entries.
    pub notification_warning: Option<String>,
}
