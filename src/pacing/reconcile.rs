use std::collections::HashSet;

use crate::report::models::{Account, SpendRecord, UndeclaredSpend};

/// Flag platform spend rows whose campaign name is not in the declared
/// registry.
///
/// The account-wide query already carries NOT_CONTAIN filters for every
/// declared name, but that upstream filter is a substring heuristic and
/// can miss when names overlap. Membership is re-checked here against
/// the exact declared set so the final list is authoritative; input
/// order is preserved.
pub fn undeclared_spenders(
    declared: &HashSet<String>,
    records: Vec<SpendRecord>,
) -> Vec<UndeclaredSpend> {
    records
        .into_iter()
        .filter(|record| !declared.contains(&record.campaign_name))
        .map(|record| UndeclaredSpend {
            name: record.campaign_name,
            spend: record.spend,
            should_not_be_spending: true,
        })
        .collect()
}

/// Union of all campaign names across every tracked account.
///
/// The declared set is global, not per-account: a name declared under
/// any account suppresses the undeclared flag everywhere it matches.
pub fn declared_names(accounts: &[Account]) -> HashSet<String> {
    accounts
        .iter()
        .flat_map(|account| account.campaigns.iter())
        .map(|campaign| campaign.name.clone())
        .collect()
}
