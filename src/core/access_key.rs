//! 44-digit access key (chave de acesso) shared by NF-e and CT-e.
//!
//! Layout: `cUF(2) AAMM(4) CNPJ(14) mod(2) serie(3) nNF(9) tpEmis(1)
//! code(8) DV(1)`.

use std::fmt;

use chrono::Datelike;
use rand::Rng;

use super::check_digit::{mod11_check_digit, mod11_is_valid};
use super::digits::{only_digits, pad_left};
use super::error::DfeError;
use super::timestamp::parse_timestamp;

/// Number of digits in an access key, check digit included.
pub const ACCESS_KEY_LEN: usize = 44;

/// Width of the numeric code component.
pub const NUMERIC_CODE_LEN: usize = 8;

const NUMERIC_CODE_SPACE: u32 = 100_000_000;

/// Source of the 8-digit numeric code used when the payload carries none.
///
/// Any `Fn() -> u32` is a source. Values are reduced modulo 10^8.
pub trait CodeSource: Send + Sync {
    fn next_code(&self) -> u32;
}

impl<F> CodeSource for F
where
    F: Fn() -> u32 + Send + Sync,
{
    fn next_code(&self) -> u32 {
        self()
    }
}

/// Uniformly random codes from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCode;

impl CodeSource for RandomCode {
    fn next_code(&self) -> u32 {
        rand::thread_rng().gen_range(0..NUMERIC_CODE_SPACE)
    }
}

/// Always the same code. Useful for reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct FixedCode(pub u32);

impl CodeSource for FixedCode {
    fn next_code(&self) -> u32 {
        self.0
    }
}

/// Document fields that make up an access key, borrowed from a validated
/// payload.
#[derive(Debug, Clone, Copy)]
pub struct KeyFields<'a> {
    /// `cUF`
    pub state_code: &'a str,
    /// `dhEmi`
    pub emitted_at: &'a str,
    /// `emit.CNPJ`
    pub issuer_cnpj: &'a str,
    /// `mod`
    pub model: &'a str,
    /// `serie`
    pub series: &'a str,
    /// `nNF` / `nCT`
    pub number: &'a str,
    /// `tpEmis`
    pub emission_type: &'a str,
    /// `cNF` / `cCT`; generated when absent or blank.
    pub numeric_code: Option<&'a str>,
}

/// A generated access key together with the numeric code it embeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessKey {
    key: String,
    numeric_code: String,
}

impl AccessKey {
    /// The full 44-digit key.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// The 43 digits preceding the check digit.
    pub fn body(&self) -> &str {
        &self.key[..ACCESS_KEY_LEN - 1]
    }

    /// The check digit as a one-character string.
    pub fn check_digit(&self) -> &str {
        &self.key[ACCESS_KEY_LEN - 1..]
    }

    /// The 8-digit numeric code, echoed back as `cNF` / `cCT`.
    pub fn numeric_code(&self) -> &str {
        &self.numeric_code
    }

    /// `cUF` component.
    pub fn state_code(&self) -> &str {
        &self.key[..2]
    }

    /// `AAMM` component.
    pub fn year_month(&self) -> &str {
        &self.key[2..6]
    }

    /// Issuer CNPJ component.
    pub fn issuer_cnpj(&self) -> &str {
        &self.key[6..20]
    }

    /// True if `candidate` is 44 digits whose last digit checks out.
    pub fn verify(candidate: &str) -> bool {
        candidate.len() == ACCESS_KEY_LEN && mod11_is_valid(candidate)
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for AccessKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

/// Assemble the access key for `fields`, drawing a numeric code from `codes`
/// only when the document does not carry one.
pub fn generate_access_key(
    fields: &KeyFields<'_>,
    codes: &dyn CodeSource,
) -> Result<AccessKey, DfeError> {
    let emitted_at = parse_timestamp(fields.emitted_at).ok_or_else(|| {
        DfeError::Format(format!(
            "dhEmi {:?} is not a valid timestamp; cannot derive AAMM",
            fields.emitted_at
        ))
    })?;
    let year_month = format!(
        "{:02}{:02}",
        emitted_at.year().rem_euclid(100),
        emitted_at.month()
    );

    let numeric_code = match fields.numeric_code.map(only_digits) {
        Some(code) if !code.is_empty() => pad_left(code, NUMERIC_CODE_LEN),
        _ => pad_left(codes.next_code() % NUMERIC_CODE_SPACE, NUMERIC_CODE_LEN),
    };

    let body = [
        pad_left(only_digits(fields.state_code), 2),
        year_month,
        pad_left(only_digits(fields.issuer_cnpj), 14),
        pad_left(only_digits(fields.model), 2),
        pad_left(only_digits(fields.series), 3),
        pad_left(only_digits(fields.number), 9),
        pad_left(only_digits(fields.emission_type), 1),
        numeric_code.clone(),
    ]
    .concat();

    if body.len() != ACCESS_KEY_LEN - 1 {
        return Err(DfeError::Format(format!(
            "access key body must have {} digits, got {}",
            ACCESS_KEY_LEN - 1,
            body.len()
        )));
    }

    let check_digit = mod11_check_digit(&body);
    let key = format!("{body}{check_digit}");
    tracing::debug!(key = %key, "access key generated");

    Ok(AccessKey { key, numeric_code })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(code: Option<&str>) -> KeyFields<'_> {
        KeyFields {
            state_code: "35",
            emitted_at: "2025-07-10T10:00:00-03:00",
            issuer_cnpj: "12.345.678/0001-95",
            model: "55",
            series: "1",
            number: "123",
            emission_type: "1",
            numeric_code: code,
        }
    }

    #[test]
    fn layout_and_padding() {
        let key = generate_access_key(&fields(Some("12345678")), &RandomCode).unwrap();
        assert_eq!(key.as_str().len(), ACCESS_KEY_LEN);
        assert_eq!(key.state_code(), "35");
        assert_eq!(key.year_month(), "2507");
        assert_eq!(key.issuer_cnpj(), "12345678000195");
        assert_eq!(&key.as_str()[20..22], "55");
        assert_eq!(&key.as_str()[22..25], "001");
        assert_eq!(&key.as_str()[25..34], "000000123");
        assert_eq!(&key.as_str()[34..35], "1");
        assert_eq!(&key.as_str()[35..43], "12345678");
        assert_eq!(key.numeric_code(), "12345678");
        assert!(AccessKey::verify(key.as_str()));
    }

    #[test]
    fn supplied_code_bypasses_source() {
        let never = || -> u32 { unreachable!("code source must not be consulted") };
        let key = generate_access_key(&fields(Some("42")), &never).unwrap();
        assert_eq!(key.numeric_code(), "00000042");
    }

    #[test]
    fn missing_code_comes_from_source() {
        let key = generate_access_key(&fields(None), &FixedCode(7)).unwrap();
        assert_eq!(key.numeric_code(), "00000007");

        let key = generate_access_key(&fields(Some("")), &FixedCode(123_456_789)).unwrap();
        assert_eq!(key.numeric_code(), "23456789");
    }

    #[test]
    fn deterministic_for_identical_input() {
        let a = generate_access_key(&fields(None), &FixedCode(55)).unwrap();
        let b = generate_access_key(&fields(None), &FixedCode(55)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn year_month_uses_utc() {
        let mut f = fields(Some("1"));
        f.emitted_at = "2025-12-31T22:00:00-03:00";
        let key = generate_access_key(&f, &RandomCode).unwrap();
        assert_eq!(key.year_month(), "2601");
    }

    #[test]
    fn unparseable_timestamp_is_format_error() {
        let mut f = fields(Some("1"));
        f.emitted_at = "not a date";
        assert!(matches!(
            generate_access_key(&f, &RandomCode),
            Err(DfeError::Format(_))
        ));
    }

    #[test]
    fn oversized_component_is_format_error() {
        let mut f = fields(Some("1"));
        f.number = "1234567890";
        assert!(matches!(
            generate_access_key(&f, &RandomCode),
            Err(DfeError::Format(_))
        ));
    }
}
