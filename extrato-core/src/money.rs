//! Money in the pt-BR decimal convention: `.` groups thousands, `,` marks decimals.
//!
//! Amounts are `rust_decimal::Decimal` end to end. Floats only appear at the
//! SQLite boundary.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// Trailing sign used by statements to mark outgoing money.
pub const DEBIT_MARKER: char = '-';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("empty amount")]
    Empty,
    #[error("'{0}' is not a number")]
    Invalid(String),
}

/// How `format_brl` renders a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoneyStyle {
    /// `R$ 1.234,56`
    #[default]
    Currency,
    /// `1.234,56`
    Plain,
}

/// Parse a statement amount token such as `1.234,56-`.
///
/// Returns the magnitude. The caller decides the sign from the debit marker.
pub fn parse_statement_amount(token: &str) -> Result<Decimal, MoneyError> {
    let token = token.trim();
    let unsigned = token.strip_suffix(DEBIT_MARKER).unwrap_or(token);
    if unsigned.is_empty() {
        return Err(MoneyError::Empty);
    }
    let normalized = unsigned.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| MoneyError::Invalid(token.to_string()))
}

/// Parse an amount typed by a person editing a row.
///
/// Accepts an optional `R$` prefix, a leading `-` or a trailing debit marker,
/// and pt-BR grouping. A second sign is rejected. Without a comma, `1.500`
/// is read as grouped thousands while `15.5` is read as a decimal point.
pub fn parse_user_amount(input: &str) -> Result<Decimal, MoneyError> {
    let mut s = input.trim();
    if let Some(rest) = s.strip_prefix("R$") {
        s = rest.trim_start();
    }

    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest.trim_start();
        // "-R$ 10,00"
        if let Some(rest) = s.strip_prefix("R$") {
            s = rest.trim_start();
        }
    }
    if let Some(rest) = s.strip_suffix(DEBIT_MARKER) {
        if negative {
            return Err(MoneyError::Invalid(input.trim().to_string()));
        }
        negative = true;
        s = rest.trim_end();
    }
    if s.is_empty() {
        return Err(MoneyError::Empty);
    }
    // one sign only
    if s.starts_with(['-', '+']) {
        return Err(MoneyError::Invalid(input.trim().to_string()));
    }

    let normalized = if s.contains(',') || is_grouped_thousands(s) {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };

    let value = Decimal::from_str(&normalized).map_err(|_| MoneyError::Invalid(input.trim().to_string()))?;
    Ok(if negative { -value } else { value })
}

fn is_grouped_thousands(s: &str) -> bool {
    let groups: Vec<&str> = s.split('.').collect();
    groups.len() >= 2
        && (1..=3).contains(&groups[0].len())
        && groups[1..].iter().all(|g| g.len() == 3)
        && groups.iter().all(|g| g.bytes().all(|b| b.is_ascii_digit()))
}

/// Round to cents, half away from zero, and pin the scale to two digits.
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut v = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    v.rescale(2);
    v
}

/// Fixed-precision integer cents.
pub fn to_cents(amount: Decimal) -> i128 {
    round_cents(amount).mantissa()
}

/// Render an amount with two decimals in the pt-BR convention.
pub fn format_brl(amount: Decimal, style: MoneyStyle) -> String {
    let v = round_cents(amount);
    let digits = v.abs().to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if v.is_sign_negative() && !v.is_zero() { "-" } else { "" };
    match style {
        MoneyStyle::Currency => format!("R$ {sign}{grouped},{frac_part}"),
        MoneyStyle::Plain => format!("{sign}{grouped},{frac_part}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_statement_amounts() {
        assert_eq!(parse_statement_amount("1.234,56-").unwrap(), dec("1234.56"));
        assert_eq!(parse_statement_amount("250,00").unwrap(), dec("250"));
        assert_eq!(parse_statement_amount("7").unwrap(), dec("7"));
        assert_eq!(parse_statement_amount("-"), Err(MoneyError::Empty));
        assert!(matches!(parse_statement_amount("1,2,3-"), Err(MoneyError::Invalid(_))));
        assert!(matches!(parse_statement_amount("1.2,3,4-"), Err(MoneyError::Invalid(_))));
    }

    #[test]
    fn test_user_amounts() {
        assert_eq!(parse_user_amount("R$ 1.234,56").unwrap(), dec("1234.56"));
        assert_eq!(parse_user_amount("-250,00").unwrap(), dec("-250"));
        assert_eq!(parse_user_amount("250,00-").unwrap(), dec("-250"));
        assert_eq!(parse_user_amount("-R$ 10,50").unwrap(), dec("-10.5"));
        assert_eq!(parse_user_amount("1.500").unwrap(), dec("1500"));
        assert_eq!(parse_user_amount("15.5").unwrap(), dec("15.5"));
        assert_eq!(parse_user_amount("  "), Err(MoneyError::Empty));
        assert!(parse_user_amount("abc").is_err());
    }

    #[test]
    fn test_user_amount_rejects_repeated_signs() {
        for input in ["--5", "-+5", "-5-", "- -5", "R$ --10,00"] {
            assert!(
                matches!(parse_user_amount(input), Err(MoneyError::Invalid(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(dec("1234.56"), MoneyStyle::Currency), "R$ 1.234,56");
        assert_eq!(format_brl(dec("-1234.5"), MoneyStyle::Currency), "R$ -1.234,50");
        assert_eq!(format_brl(dec("-1234.5"), MoneyStyle::Plain), "-1.234,50");
        assert_eq!(format_brl(dec("0.005"), MoneyStyle::Plain), "0,01");
        assert_eq!(format_brl(dec("1000000"), MoneyStyle::Plain), "1.000.000,00");
        assert_eq!(format_brl(dec("-0.001"), MoneyStyle::Plain), "0,00");
        assert_eq!(format_brl(dec("999"), MoneyStyle::Plain), "999,00");
    }

    #[test]
    fn test_cents_ignore_trailing_zeros() {
        assert_eq!(to_cents(dec("250")), 25000);
        assert_eq!(to_cents(dec("250.000")), 25000);
        assert_eq!(to_cents(dec("-250.0")), -25000);
    }
}
