//! Money parsing, rounding and formatting helpers.
//!
//! All amounts are `rust_decimal::Decimal` with two decimal places once they
//! leave the form. Rounding is half-away-from-zero, which matches the
//! backend's HALF_UP rounding at scale 2.

use rust_decimal::prelude::*;

/// Decimal places kept for money
pub const MONEY_SCALE: u32 = 2;

/// Round to cents, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse user-typed money or a split value. Accepts surrounding whitespace,
/// a leading currency symbol and thousands separators.
pub fn parse_decimal(input: &str) -> Result<Decimal, String> {
    let cleaned: String = input
        .trim()
        .trim_start_matches(['$', '€', '£'])
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    // "12." is a partially typed "12"
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);
    if cleaned.is_empty() {
        return Err("Empty value".to_string());
    }

    Decimal::from_str(cleaned).map_err(|e| format!("Invalid number format: {}", e))
}

/// Parse an amount that must be strictly positive
pub fn parse_positive_amount(input: &str) -> Result<Decimal, String> {
    let amount = parse_decimal(input)?;
    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than 0".to_string());
    }
    Ok(amount)
}

/// Sum that reports overflow instead of panicking. Split and payer inputs
/// accept any number of digits, so totals can exceed `Decimal::MAX`.
pub fn checked_sum<'a>(values: impl IntoIterator<Item = &'a Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))
}

/// Keep digits and the first decimal point only, the way the split inputs
/// filter keystrokes so partially typed values like `"12."` survive.
pub fn sanitize_decimal_input(input: &str) -> String {
    let mut seen_point = false;
    input
        .chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// `true` when `a` and `b` differ by no more than `tolerance`
pub fn within_tolerance(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

/// Two-decimal rendering without a currency marker, e.g. `"12.50"`
pub fn format_plain(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}

/// Render an amount with its currency, e.g. `"$12.50"` or `"12.50 EUR"`
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}", sign, symbol, digits),
        None => format!("{}{} {}", sign, digits, currency),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "USD" | "CAD" | "AUD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "INR" => Some("₹"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(3.335)), dec!(3.34));
        assert_eq!(round_money(dec!(3.334)), dec!(3.33));
        assert_eq!(round_money(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_money(dec!(2.5)), dec!(2.50));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("10.50").unwrap(), dec!(10.50));
        assert_eq!(parse_decimal(" $1,234.56 ").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("5").unwrap(), dec!(5));
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("  ").is_err());
    }

    #[test]
    fn test_parse_positive_amount() {
        assert_eq!(parse_positive_amount("0.01").unwrap(), dec!(0.01));
        assert!(parse_positive_amount("0").is_err());
        assert!(parse_positive_amount("-4").is_err());
    }

    #[test]
    fn test_sanitize_decimal_input() {
        assert_eq!(sanitize_decimal_input("12.5.1"), "12.51");
        assert_eq!(sanitize_decimal_input("a1b2%"), "12");
        assert_eq!(sanitize_decimal_input("-3"), "3");
        assert_eq!(sanitize_decimal_input("12."), "12.");
    }

    #[test]
    fn test_within_tolerance() {
        let tolerance = dec!(0.005);
        assert!(within_tolerance(dec!(50.004), dec!(50), tolerance));
        assert!(within_tolerance(dec!(49.995), dec!(50), tolerance));
        assert!(!within_tolerance(dec!(49.99), dec!(50), tolerance));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(12.5), "USD"), "$12.50");
        assert_eq!(format_money(dec!(-3), "EUR"), "-€3.00");
        assert_eq!(format_money(dec!(7.256), "CHF"), "7.26 CHF");
        assert_eq!(format_plain(dec!(10)), "10.00");
    }
}
