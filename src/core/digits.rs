//! Digit normalization, fixed-width padding and decimal formatting.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::DfeError;
use super::types::Numeric;

/// Strip every character that is not an ASCII digit.
///
/// Never fails; an input without digits yields an empty string and the caller
/// decides whether that is an error.
pub fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Left-pad `value` with zeros up to `width` characters.
///
/// Wider input is returned unchanged, never truncated.
pub fn pad_left(value: impl ToString, width: usize) -> String {
    format!("{:0>width$}", value.to_string())
}

/// Parse a [`Numeric`] into an exact decimal.
///
/// Strings may use `,` as the decimal separator and scientific notation.
pub fn parse_decimal(value: &Numeric) -> Result<Decimal, DfeError> {
    match value {
        Numeric::Number(n) if n.is_finite() => Decimal::from_f64_retain(*n)
            .ok_or_else(|| DfeError::Format(format!("numeric value out of range: {n}"))),
        Numeric::Number(n) => Err(invalid_numeric(&n.to_string())),
        Numeric::Text(s) => {
            let normalized = s.trim().replacen(',', ".", 1);
            if normalized.is_empty() {
                return Err(invalid_numeric(s));
            }
            Decimal::from_str(&normalized)
                .or_else(|_| Decimal::from_scientific(&normalized))
                .map_err(|_| invalid_numeric(s))
        }
    }
}

/// Render a [`Numeric`] with exactly `decimals` fractional digits.
///
/// Midpoints round away from zero.
pub fn format_decimal(value: &Numeric, decimals: u32) -> Result<String, DfeError> {
    render_decimal(parse_decimal(value)?, decimals)
}

/// Render an already parsed decimal with exactly `decimals` fractional digits.
///
/// Fails when the value has too many integer digits to carry `decimals`
/// fractional ones.
pub fn render_decimal(value: Decimal, decimals: u32) -> Result<String, DfeError> {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(decimals);
    if rounded.scale() != decimals {
        return Err(DfeError::Format(format!(
            "amount {value} out of range for {decimals} decimal places"
        )));
    }
    Ok(rounded.to_string())
}

fn invalid_numeric(raw: &str) -> DfeError {
    DfeError::Format(format!("invalid numeric value: {raw:?}"))
}
