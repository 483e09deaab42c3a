//! Scaling between human readable decimal amounts and integer base units
//! (wei for the native asset, the smallest token unit for ERC-20s).

use {
    crate::conversions::{big_uint_to_u256, u256_to_big_uint},
    alloy::primitives::U256,
    bigdecimal::BigDecimal,
    num::{Signed, Zero},
    std::str::FromStr,
};

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("{0:?} is not a decimal number")]
    Invalid(String),
    #[error("amount must not be negative")]
    Negative,
    #[error("amount does not fit into 256 bits")]
    Overflow,
}

/// Decimal digits of `U256::MAX`.
const MAX_DIGITS: i64 = 78;

/// Parses a decimal amount such as `"1.5"` and scales it by `10^decimals`.
///
/// Digits below the smallest unit are truncated, so `"0.0000001"` with 6
/// decimals parses to zero. Exponent notation is accepted; the magnitude is
/// checked before any power of ten is materialized.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, ParseError> {
    let amount = amount.trim();
    let value =
        BigDecimal::from_str(amount).map_err(|_| ParseError::Invalid(amount.to_owned()))?;
    if value.is_negative() {
        return Err(ParseError::Negative);
    }
    if value.is_zero() {
        return Ok(U256::ZERO);
    }
    let (digits, scale) = value.as_bigint_and_exponent();
    let scale = scale - i64::from(decimals);
    let len = i64::try_from(digits.to_string().len()).map_err(|_| ParseError::Overflow)?;
    let integer_digits = len.saturating_sub(scale);
    if integer_digits <= 0 {
        return Ok(U256::ZERO);
    }
    if integer_digits > MAX_DIGITS {
        return Err(ParseError::Overflow);
    }
    let (int, _) = BigDecimal::new(digits, scale)
        .with_scale(0)
        .as_bigint_and_exponent();
    let uint = int.to_biguint().ok_or(ParseError::Negative)?;
    big_uint_to_u256(&uint).ok_or(ParseError::Overflow)
}

/// Converts an integer amount of base units back into a decimal amount.
pub fn format_units(amount: U256, decimals: u8) -> BigDecimal {
    BigDecimal::new(u256_to_big_uint(&amount).into(), i64::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_amounts() {
        for (amount, decimals, expected) in [
            ("0.01", 18, 10_000_000_000_000_000_u128),
            ("4.20", 18, 4_200_000_000_000_000_000),
            ("10", 6, 10_000_000),
            ("1.2345678", 6, 1_234_567),
            ("0", 18, 0),
            (" 7 ", 0, 7),
        ] {
            assert_eq!(
                parse_units(amount, decimals).unwrap(),
                U256::from(expected),
                "{amount} with {decimals} decimals"
            );
        }
    }

    #[test]
    fn rejects_invalid_amounts() {
        assert_eq!(
            parse_units("abc", 18),
            Err(ParseError::Invalid("abc".to_owned()))
        );
        assert_eq!(parse_units("", 18), Err(ParseError::Invalid(String::new())));
        assert_eq!(parse_units("-1", 18), Err(ParseError::Negative));
        assert_eq!(
            parse_units(&format!("1{}", "0".repeat(78)), 18),
            Err(ParseError::Overflow)
        );
    }

    #[test]
    fn exponent_notation() {
        assert_eq!(parse_units("1e2", 0), Ok(U256::from(100)));
        assert_eq!(parse_units("15e-1", 6), Ok(U256::from(1_500_000)));
        assert_eq!(parse_units("0e5000000", 18), Ok(U256::ZERO));
        assert_eq!(parse_units("1e-5000000", 18), Ok(U256::ZERO));
        assert_eq!(parse_units("1e59", 18), Ok(U256::from(10).pow(U256::from(77))));
        assert_eq!(parse_units("1e60", 18), Err(ParseError::Overflow));
    }

    #[test]
    fn huge_exponent_fails_fast() {
        let start = std::time::Instant::now();
        assert_eq!(parse_units("1e5000000", 18), Err(ParseError::Overflow));
        assert_eq!(parse_units("1e50000000", 18), Err(ParseError::Overflow));
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn formats_base_units() {
        assert_eq!(
            format_units(U256::from(1_500_000_u64), 6),
            "1.5".parse::<BigDecimal>().unwrap()
        );
        assert_eq!(
            format_units(U256::ZERO, 18),
            BigDecimal::from(0)
        );
    }
}
