//! Rule helpers shared by the NF-e and CT-e validators.
//!
//! Every helper fails fast with a [`ValidationError`] naming the dotted wire
//! path of the offending field.

use super::digits::only_digits;
use super::error::ValidationError;
use super::timestamp::parse_timestamp;
use super::types::Address;

pub type RuleResult<T = ()> = Result<T, ValidationError>;

/// Unwrap a required section.
pub fn require<'a, T>(section: Option<&'a T>, field: &str) -> RuleResult<&'a T> {
    section.ok_or_else(|| ValidationError::missing(field))
}

/// A required text field must contain something besides whitespace.
pub fn require_text(value: &str, field: &str) -> RuleResult {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

/// True if `value` is absent or blank.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Check a tax-ID-like field and return its digits.
///
/// Formatting punctuation (`.`, `/`, `-`, spaces) is stripped; letters or a
/// digit-free value are rejected. With `len`, the digit count must match.
pub fn ensure_digits(value: &str, field: &str, len: Option<usize>) -> RuleResult<String> {
    let digits = only_digits(value);
    if digits.is_empty() || value.chars().any(char::is_alphabetic) {
        return Err(ValidationError::new(field, "must contain only digits"));
    }
    match len {
        Some(n) if digits.len() != n => Err(ValidationError::new(
            field,
            format!("must have {n} digits, got {}", digits.len()),
        )),
        _ => Ok(digits),
    }
}

/// Check a field that lands in a fixed-width slot of the access key.
pub fn check_key_width(value: &str, field: &str, max: usize) -> RuleResult {
    require_text(value, field)?;
    let digits = ensure_digits(value, field, None)?;
    if digits.len() > max {
        return Err(ValidationError::new(
            field,
            format!("must have at most {max} digits, got {}", digits.len()),
        ));
    }
    Ok(())
}

/// The emission timestamp must parse.
pub fn check_timestamp(value: &str, field: &str) -> RuleResult {
    require_text(value, field)?;
    if parse_timestamp(value).is_none() {
        return Err(ValidationError::new(
            field,
            format!("{value:?} is not a valid date-time"),
        ));
    }
    Ok(())
}

/// Require the mandatory sub-fields of an address.
///
/// `CEP` is checked only when `require_postal_code` is set.
pub fn validate_address<'a>(
    address: Option<&'a Address>,
    path: &str,
    require_postal_code: bool,
) -> RuleResult<&'a Address> {
    let address = require(address, path)?;
    let mandatory = [
        ("xLgr", address.street.as_str()),
        ("nro", address.number.as_str()),
        ("xBairro", address.district.as_str()),
        ("cMun", address.municipality_code.as_str()),
        ("xMun", address.municipality.as_str()),
        ("UF", address.state.as_str()),
    ];
    for (tag, value) in mandatory {
        require_text(value, &format!("{path}.{tag}"))?;
    }
    if require_postal_code && is_blank(address.postal_code.as_deref()) {
        return Err(ValidationError::missing(format!("{path}.CEP")));
    }
    require_text(&address.country_code, &format!("{path}.cPais"))?;
    require_text(&address.country, &format!("{path}.xPais"))?;
    Ok(address)
}
