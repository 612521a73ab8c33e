//! Deduplication identity for imported transactions.

use rust_decimal::Decimal;

use crate::money::to_cents;

/// Characters of the description that take part in the key.
pub const KEY_DESCRIPTION_CHARS: usize = 50;
pub const KEY_DELIMITER: char = '-';

/// Build the uniqueness key `date-description[..50]-cents`.
///
/// The amount goes in as integer cents, so `250,0` and `250,00` on two
/// statements describe the same transaction.
pub fn dedup_key(date_text: &str, description: &str, amount: Decimal) -> String {
    let head: String = description.chars().take(KEY_DESCRIPTION_CHARS).collect();
    format!(
        "{date_text}{KEY_DELIMITER}{head}{KEY_DELIMITER}{}",
        to_cents(amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_key_shape() {
        let key = dedup_key("15/03/24", "SUPERMARKET ABC", Decimal::from_str("-250.00").unwrap());
        assert_eq!(key, "15/03/24-SUPERMARKET ABC--25000");
    }

    #[test]
    fn test_key_truncates_description_by_chars() {
        let long = "Ã".repeat(80);
        let key = dedup_key("01/01/24", &long, Decimal::ONE);
        assert_eq!(key, format!("01/01/24-{}-100", "Ã".repeat(50)));

        // Differences past the cut do not matter.
        let a = format!("{}TAIL A", "X".repeat(50));
        let b = format!("{}TAIL B", "X".repeat(50));
        assert_eq!(dedup_key("01/01/24", &a, Decimal::ONE), dedup_key("01/01/24", &b, Decimal::ONE));
    }

    #[test]
    fn test_key_is_scale_independent() {
        let a = dedup_key("01/01/24", "PIX", Decimal::from_str("-250.0").unwrap());
        let b = dedup_key("01/01/24", "PIX", Decimal::from_str("-250.000").unwrap());
        assert_eq!(a, b);
    }
}
