use rust_decimal::Decimal;

use crate::report::models::InsightRecord;

/// Sum the spend figures of one campaign-window query into a single
/// total. The platform may split the window into several insight rows;
/// an empty result sums to zero.
pub fn total_spend(records: &[InsightRecord]) -> Decimal {
    records.iter().map(|r| r.spend).sum()
}
