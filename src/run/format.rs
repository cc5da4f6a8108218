use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::from_serial;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `-1234567.891` → `"-$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs().round_dp(2);
    let formatted = format!("{abs:.2}");
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Serial day count as `MM/DD/YYYY`, or the raw number if out of range.
pub(crate) fn format_serial_date(serial: i64) -> String {
    from_serial(serial)
        .map(|d: NaiveDate| d.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| serial.to_string())
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
