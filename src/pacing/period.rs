use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

/// Inclusive day count of a campaign period.
///
/// A one-day campaign (start == end) has length 1. Rejects inverted
/// ranges so the budget math downstream never divides by zero.
pub fn period_length(start: NaiveDate, end: NaiveDate) -> AppResult<i64> {
    if end < start {
        return Err(AppError::InvalidRange { start, end });
    }
    Ok((end - start).num_days() + 1)
}

/// Days elapsed as of `now`, clamped to `[1, period_length]`.
///
/// Clamping is total: before the period starts this is 1, after it ends
/// it is the full period length, so pacing never extrapolates past the
/// window.
pub fn elapsed_days(start: NaiveDate, period_length: i64, now: NaiveDate) -> i64 {
    let elapsed = (now - start).num_days() + 1;
    elapsed.clamp(1, period_length)
}
