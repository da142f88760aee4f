//! Conversions into exact rationals.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::error::{Error, Result};

/// Exact binary value of a finite float. NaN and infinities are rejected.
pub fn from_f64(value: f64) -> Result<BigRational> {
    if !value.is_finite() {
        return Err(Error::InvalidNumber(value));
    }

    BigRational::from_float(value).ok_or(Error::InvalidNumber(value))
}

/// Nearest `f64` to an exact rational.
pub fn to_f64(value: &BigRational) -> Result<f64> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Unrepresentable(value.to_string()))
}

/// Parses `-3`, `1/3` or `0.125` into an exact rational.
///
/// Decimal text is read digit by digit, so `0.1` is exactly one tenth rather
/// than the binary float closest to it.
pub fn parse(text: &str) -> Result<BigRational> {
    let invalid = || Error::InvalidRational(text.to_string());
    let trimmed = text.trim();

    if let Some((numer, denom)) = trimmed.split_once('/') {
        let numer: BigInt = numer.trim().parse().map_err(|_| invalid())?;
        let denom: BigInt = denom.trim().parse().map_err(|_| invalid())?;
        if denom.is_zero() {
            return Err(invalid());
        }
        return Ok(BigRational::new(numer, denom));
    }

    parse_decimal(trimmed).ok_or_else(invalid)
}

fn parse_decimal(text: &str) -> Option<BigRational> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let numer: BigInt = format!("{whole}{fraction}").parse().ok()?;
    let denom = num_traits::pow(BigInt::from(10u32), fraction.len());
    let value = BigRational::new(numer, denom);

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(numer: i64, denom: i64) -> BigRational {
        BigRational::new(numer.into(), denom.into())
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse("42").unwrap(), ratio(42, 1));
        assert_eq!(parse(" -3 ").unwrap(), ratio(-3, 1));
        assert_eq!(parse("1/3").unwrap(), ratio(1, 3));
        assert_eq!(parse("-2/4").unwrap(), ratio(-1, 2));
        assert_eq!(parse("0.1").unwrap(), ratio(1, 10));
        assert_eq!(parse("-2.5").unwrap(), ratio(-5, 2));
        assert_eq!(parse(".5").unwrap(), ratio(1, 2));
        assert_eq!(parse("+7.").unwrap(), ratio(7, 1));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["", ".", "abc", "1/0", "1.2.3", "1/x", "--1", "1e3"] {
            assert!(
                matches!(parse(text), Err(Error::InvalidRational(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(from_f64(0.5).unwrap(), ratio(1, 2));
        assert_eq!(from_f64(-3.0).unwrap(), ratio(-3, 1));
        // 0.1 has no exact binary form, the stored value is the float's own.
        assert_ne!(from_f64(0.1).unwrap(), ratio(1, 10));

        assert!(matches!(from_f64(f64::NAN), Err(Error::InvalidNumber(_))));
        assert!(matches!(from_f64(f64::INFINITY), Err(Error::InvalidNumber(_))));
        assert!(matches!(from_f64(f64::NEG_INFINITY), Err(Error::InvalidNumber(_))));
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(to_f64(&ratio(1, 4)).unwrap(), 0.25);
        assert_eq!(to_f64(&ratio(-15, 1)).unwrap(), -15.0);

        let huge = BigRational::from_integer(num_traits::pow(BigInt::from(10u32), 400));
        assert!(matches!(to_f64(&huge), Err(Error::Unrepresentable(_))));
    }
}
