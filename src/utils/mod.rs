//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of currency, percentage and decimal values throughout the
//! application. Amounts use Italian locale conventions.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "€ " prefix
    Eur,
    /// No currency symbol (for table cells)
    None,
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value using Italian locale conventions:
/// - Thousands separator: `.` (period)
/// - Decimal separator: `,` (comma)
///
/// Values are rounded to cents, half away from zero. Rounding happens here
/// only; computations keep full precision.
///
/// # Examples
/// ```
/// use plusvalenze::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234.56), 0, CurrencySymbol::Eur),
///     "€ 1.234,56"
/// );
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234), 15, CurrencySymbol::None),
///     "       1.234,00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let is_negative = rounded < Decimal::ZERO;
    let abs_value = rounded.abs();

    let formatted = format!("{:.2}", abs_value);
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));
    let with_separators = group_thousands(integer_part);

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::Eur => "€ ",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{},{}", prefix, sign, with_separators, decimal_part);

    // Apply width padding (right-align); count chars, "€" is multi-byte
    if width > 0 && result.chars().count() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

/// Insert `.` every three digits, counting from the right
fn group_thousands(digits: &str) -> String {
    digits
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec!['.', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

// ============ Convenience functions ============

/// Format as Euro with symbol: "€ 1.234,56"
///
/// # Examples
/// ```
/// use plusvalenze::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "€ 1.234,56");
/// assert_eq!(format_currency(dec!(-500)), "€ -500,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::Eur)
}

/// Format number only (no symbol): "1.234,56"
pub fn format_decimal_it(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::None)
}

/// Format a unit price with two to four decimals: "1.234,5678", "1.234,50"
///
/// # Examples
/// ```
/// use plusvalenze::utils::format_unit_price_it;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_unit_price_it(dec!(1234.5678)), "1.234,5678");
/// assert_eq!(format_unit_price_it(dec!(1234.5)), "1.234,50");
/// ```
pub fn format_unit_price_it(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let decimals = rounded.scale().max(2) as usize;
    let formatted = format!("{:.*}", decimals, rounded.abs());
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}{},{}", sign, group_thousands(integer_part), decimal_part)
}

/// Format a rate as an Italian percentage: 0.125 -> "12,5%", 0.26 -> "26%"
///
/// # Examples
/// ```
/// use plusvalenze::utils::format_rate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_rate(dec!(0.125)), "12,5%");
/// assert_eq!(format_rate(dec!(0.26)), "26%");
/// ```
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED).normalize();
    format!("{}%", percent.to_string().replace('.', ","))
}

fn strip_currency(input: &str) -> &str {
    input
        .trim()
        .trim_start_matches('€')
        .trim_end_matches('€')
        .trim()
}

/// Parse a user-entered decimal, accepting Italian notation.
///
/// "1.234,56" and "1234,56" are read with a decimal comma; plain "1234.56"
/// keeps the dot. A leading or trailing `€` is ignored. Blank input is `None`.
pub fn parse_decimal_it(input: &str) -> Option<Decimal> {
    let trimmed = strip_currency(input);
    if trimmed.is_empty() {
        return None;
    }

    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    normalized.parse::<Decimal>().ok()
}

/// Parse a decimal written strictly in Italian notation.
///
/// `,` is the only decimal separator and `.` only groups thousands, so
/// "1.000" is one thousand. A dot that does not split the integer part into
/// groups of three digits makes the input invalid.
///
/// # Examples
/// ```
/// use plusvalenze::utils::parse_decimal_it_strict;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_decimal_it_strict("1.000"), Some(dec!(1000)));
/// assert_eq!(parse_decimal_it_strict("10,00 €"), Some(dec!(10)));
/// assert_eq!(parse_decimal_it_strict("10.5"), None);
/// ```
pub fn parse_decimal_it_strict(input: &str) -> Option<Decimal> {
    let trimmed = strip_currency(input);
    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed),
    };
    let (integer_part, decimal_part) = match unsigned.split_once(',') {
        Some((int, dec)) => (int, Some(dec)),
        None => (unsigned, None),
    };

    let mut groups = integer_part.split('.');
    let leading = groups.next().unwrap_or_default();
    let grouped = integer_part.contains('.');
    if leading.is_empty() || (grouped && leading.len() > 3) {
        return None;
    }
    if groups.any(|g| g.len() != 3) {
        return None;
    }
    let digits = integer_part.replace('.', "");
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match decimal_part {
        Some(dec) if dec.is_empty() || !dec.chars().all(|c| c.is_ascii_digit()) => return None,
        Some(dec) => format!("{}{}.{}", sign, digits, dec),
        None => format!("{}{}", sign, digits),
    };
    normalized.parse::<Decimal>().ok()
}
