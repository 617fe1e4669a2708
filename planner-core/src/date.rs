//! Due-date window evaluation
//!
//! Due dates are kept as the raw `YYYY-MM-DD` text the user submitted.
//! The "due soon" check reads the year, month and day from fixed offsets
//! instead of parsing a calendar date, and deliberately approximates a
//! three-day lookahead.

use chrono::{Datelike, NaiveDate};

/// Number of days ahead, within the same month, that counts as "soon"
pub const DUE_SOON_DAYS: i32 = 3;

/// Day of month from which a date early next month also counts as "soon"
const MONTH_END_DAY: i32 = 28;

/// Decide whether `due_date` falls inside the due-soon window relative to `today`.
///
/// Returns `true` when the due date is in the current year and either
/// - in the current month, 0 to 3 days from today, or
/// - in the next month on day 1 to 3 while today is day 28 or later.
///
/// Empty, short or non-numeric input yields `false`. December to January
/// is never considered soon, and short months are treated like long ones.
pub fn is_due_soon(due_date: &str, today: NaiveDate) -> bool {
    let Some((year, month, day)) = split_date_fields(due_date) else {
        return false;
    };

    let current_year = today.year();
    let current_month = today.month() as i32;
    let current_day = today.day() as i32;

    if year != current_year {
        return false;
    }

    if month == current_month {
        let day_diff = day - current_day;
        (0..=DUE_SOON_DAYS).contains(&day_diff)
    } else {
        month == current_month + 1 && day <= DUE_SOON_DAYS && current_day >= MONTH_END_DAY
    }
}

/// Read (year, month, day) from offsets 0..4, 5..7 and 8..10, digits only
fn split_date_fields(due_date: &str) -> Option<(i32, i32, i32)> {
    if due_date.len() < 10 {
        return None;
    }

    let field = |range: std::ops::Range<usize>| {
        let digits = due_date.get(range)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<i32>().ok()
    };

    Some((field(0..4)?, field(5..7)?, field(8..10)?))
}
