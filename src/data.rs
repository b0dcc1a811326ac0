use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::record::is_placeholder;

/// Day-first date format used by both sheets (`15-01-2025`).
pub const SHEET_DATE_FORMAT: &str = "%d-%m-%Y";

/// Parses a monetary or numeric sheet cell. Blank, sentinel, and non-numeric
/// cells yield `None`.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    if is_placeholder(value) {
        return None;
    }
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parses the date part of a `DD-MM-YYYY[ HH:MM]` cell.
pub fn parse_sheet_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, SHEET_DATE_FORMAT).ok()
}

/// Year token of a `DD-MM-YYYY[ HH:MM]` cell: whatever follows the second
/// hyphen, up to the first whitespace. Returns `""` when there is no second
/// hyphen.
pub fn extract_year(value: &str) -> &str {
    let mut parts = value.trim().splitn(3, '-');
    let (Some(_), Some(_), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return "";
    };
    rest.split_whitespace().next().unwrap_or("")
}

/// Parses a user-supplied date bound. ISO dates are preferred; the sheet's own
/// day-first formats are accepted too.
pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", SHEET_DATE_FORMAT, "%d/%m/%Y", "%Y/%m/%d"];
    let trimmed = value.trim();
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}
