//! Display formatting for Chilean sheet values.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::data::parse_amount;

pub const NOT_AVAILABLE: &str = "N/A";

/// Formats a raw price cell as Chilean pesos, e.g. `"1234567"` as `$1.234.567`.
/// Cells that do not parse render as `N/A`.
pub fn clp(value: &str) -> String {
    parse_amount(value).map_or_else(|| NOT_AVAILABLE.to_string(), clp_amount)
}

/// Whole pesos with `.` thousands separators; halves round away from zero.
pub fn clp_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Date part of a `DD-MM-YYYY[ HH:MM]` cell, or `N/A` when blank.
pub fn display_date(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or(NOT_AVAILABLE)
}

/// Trimmed cell text, or `N/A` when blank.
pub fn or_na(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE
    } else {
        trimmed
    }
}

/// Hours with at most one decimal place.
pub fn hours(value: Decimal) -> String {
    value
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}
