use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::AppResult;
use crate::pacing::period::{elapsed_days, period_length};
use crate::report::models::PacingResult;

/// Compare actual spend-to-date against a linear expected-spend
/// trajectory over the campaign window.
///
/// `spend == expected_spend` counts as on track; a negative offset means
/// under budget and is not an error. When no days remain the suggested
/// daily budget is zero, regardless of over/under spend.
pub fn pace(
    name: &str,
    spend: Decimal,
    set_budget: Decimal,
    start: NaiveDate,
    end: NaiveDate,
    now: NaiveDate,
) -> AppResult<PacingResult> {
    let total_days = period_length(start, end)?;
    let daily_budget = set_budget / Decimal::from(total_days);

    let elapsed = elapsed_days(start, total_days, now);

    let expected_spend = daily_budget * Decimal::from(elapsed);
    let offset_amount = spend - expected_spend;
    let on_track = spend <= expected_spend;

    let remaining_days = total_days - elapsed;
    let suggested_daily_budget = if remaining_days > 0 {
        (set_budget - spend) / Decimal::from(remaining_days)
    } else {
        Decimal::ZERO
    };

    Ok(PacingResult {
        name: name.to_string(),
        start_date: start,
        end_date: end,
        set_budget,
        daily_budget,
        spend,
        expected_spend,
        offset_amount,
        on_track,
        suggested_daily_budget,
    })
}
