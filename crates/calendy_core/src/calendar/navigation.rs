//! Month-to-month navigation over a reference date.
//!
//! Day overflow is delegated to chrono: shifting Jan 31 forward lands on the
//! last day of February.

use chrono::{Months, NaiveDate};

const ONE_MONTH: Months = Months::new(1);

/// Shifts `date` back by one calendar month.
///
/// Returns `date` unchanged if the result would leave the representable range.
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(ONE_MONTH).unwrap_or(date)
}

/// Shifts `date` forward by one calendar month.
///
/// Returns `date` unchanged if the result would leave the representable range.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(ONE_MONTH).unwrap_or(date)
}

/// Month heading, e.g. `March 2025`.
///
/// Month names are always English; chrono's `%B` ignores the user locale.
pub fn month_title(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
