//! USD display and parsing helpers.
//!
//! Portfolio values travel as display strings ("$12,000"), so both directions
//! live next to each other here. Parsing is strict: a malformed value string
//! yields `None` rather than a silent zero, leaving the caller to decide
//! whether to log the anomaly.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Format a dollar amount for display, rounded to whole dollars with
/// thousands separators (e.g., `"$12,000"`).
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0);

    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Parse a display string produced by [`format_usd`] back to a decimal.
///
/// Strips `$` and `,` before parsing. Returns `None` for anything that does
/// not parse as a decimal number afterward.
#[must_use]
pub fn parse_usd(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_grouping() {
        assert_eq!(format_usd(Decimal::from(0)), "$0");
        assert_eq!(format_usd(Decimal::from(999)), "$999");
        assert_eq!(format_usd(Decimal::from(12_000)), "$12,000");
        assert_eq!(format_usd(Decimal::from(1_234_567)), "$1,234,567");
    }

    #[test]
    fn test_format_usd_rounds_to_whole_dollars() {
        assert_eq!(format_usd(Decimal::new(123_449, 2)), "$1,234");
        assert_eq!(format_usd(Decimal::new(123_450, 2)), "$1,235");
    }

    #[test]
    fn test_parse_usd_round_trip() {
        let amount = Decimal::from(12_000);
        assert_eq!(parse_usd(&format_usd(amount)), Some(amount));
    }

    #[test]
    fn test_parse_usd_malformed_is_none() {
        assert_eq!(parse_usd(""), None);
        assert_eq!(parse_usd("$"), None);
        assert_eq!(parse_usd("twelve grand"), None);
        assert_eq!(parse_usd("$12,000.50"), Some(Decimal::new(12_000_50, 2)));
    }
}
