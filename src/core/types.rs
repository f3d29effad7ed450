use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A numeric field as it arrives on the wire: either a JSON number or a
/// string using `.` or `,` as decimal separator.
///
/// Parsing is deferred to [`format_decimal`](super::format_decimal) so that an
/// unparseable value surfaces as [`DfeError::Format`](super::DfeError::Format)
/// at the point where it is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// True for an empty or whitespace-only string.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Numeric {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Numeric {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Numeric {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Decimal> for Numeric {
    fn from(d: Decimal) -> Self {
        Self::Text(d.to_string())
    }
}

/// Postal address block shared by every party of both document kinds
/// (`enderEmit`, `enderDest`, `enderReme`, `enderToma`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// `xLgr`: street.
    #[serde(rename = "xLgr", default)]
    pub street: String,
    /// `nro`: building number.
    #[serde(rename = "nro", default)]
    pub number: String,
    /// `xCpl`: complement.
    #[serde(rename = "xCpl", default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    /// `xBairro`: district.
    #[serde(rename = "xBairro", default)]
    pub district: String,
    /// `cMun`: IBGE municipality code.
    #[serde(rename = "cMun", default)]
    pub municipality_code: String,
    /// `xMun`: municipality name.
    #[serde(rename = "xMun", default)]
    pub municipality: String,
    /// `UF`: state abbreviation.
    #[serde(rename = "UF", default)]
    pub state: String,
    /// `CEP`: postal code. Mandatory for NF-e parties only.
    #[serde(rename = "CEP", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// `cPais`: BACEN country code.
    #[serde(rename = "cPais", default)]
    pub country_code: String,
    /// `xPais`: country name.
    #[serde(rename = "xPais", default)]
    pub country: String,
    /// `fone`: telephone.
    #[serde(rename = "fone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Outcome reported by a successful emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationStatus {
    Authorized,
}

/// Deserialize a code the wire allows as either string or number (`serie`,
/// `nNF`, `nCT`) into its string form.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(StringOrNumberVisitor)
}

struct StringOrNumberVisitor;

impl Visitor<'_> for StringOrNumberVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }
}
