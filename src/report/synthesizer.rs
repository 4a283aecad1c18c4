use rust_decimal::Decimal;

use crate::report::models::{
    AccountReport, PacingResult, ReportEntry, UndeclaredSpend,
};

/// Everything the pipeline produced for one account, in declared order.
#[derive(Debug, Clone)]
pub struct AccountFindings {
    pub account_name: String,
    pub pacing: Vec<PacingResult>,
    pub undeclared: Vec<UndeclaredSpend>,
}

/// Compose per-account findings into the structured entry list and the
/// notification text block. Pure; dispatch of the text is the caller's
/// concern.
pub fn synthesize(findings: Vec<AccountFindings>) -> (Vec<ReportEntry>, String) {
    let mut entries = Vec::new();
    let mut message = String::from("*Facebook Ads Spend Report*\n");

    for finding in findings {
        message.push_str(&format!("\n*Account: {}*\n", finding.account_name));

        for result in &finding.pacing {
            message.push_str(&format_pacing(result));
        }

        entries.push(ReportEntry::Account(AccountReport {
            account_name: finding.account_name,
            campaigns: finding.pacing,
        }));

        for undeclared in finding.undeclared {
            message.push_str(&format!(
                "  *Campaign: {} (Should not have been spending)*\n    • Spend: {}\n",
                undeclared.name,
                money(undeclared.spend),
            ));
            entries.push(ReportEntry::Undeclared(undeclared));
        }
    }

    (entries, message)
}

fn format_pacing(result: &PacingResult) -> String {
    format!(
        concat!(
            "  *Campaign: {}*\n",
            "    • Start Date: {}\n",
            "    • End Date: {}\n",
            "    • Set Budget: {}\n",
            "    • Spend: {}\n",
            "    • Expected Spend: {}\n",
            "    • Offset Amount: {}\n",
            "    • On Track: {}\n",
            "    • Suggested Daily Budget: {}\n",
        ),
        result.name,
        result.start_date,
        result.end_date,
        money(result.set_budget),
        money(result.spend),
        money(result.expected_spend),
        money(result.offset_amount),
        if result.on_track { "Yes" } else { "No" },
        money(result.suggested_daily_budget),
    )
}

/// User-facing financial figures are rendered to 2 decimal places.
fn money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
