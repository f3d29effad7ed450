//! The service payer (tomador).

use serde::{Deserialize, Serialize};

use crate::core::{Address, ValidationError, string_or_number};

use super::types::CteParty;

/// Role code that requires an embedded [`OtherPayer`].
pub const OTHER_PAYER_CODE: &str = "4";

/// Wire form of `toma`: a role code plus, for role 4 only, the payer itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tomador {
    /// `toma`: "0" to "4".
    #[serde(rename = "toma", default, deserialize_with = "string_or_number")]
    pub role: String,
    /// `toma3`: full identification of a payer outside the transport chain.
    #[serde(rename = "toma3", default, skip_serializing_if = "Option::is_none")]
    pub other: Option<OtherPayer>,
}

/// Payer that is none of the parties already named on the CT-e.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherPayer {
    #[serde(flatten)]
    pub party: CteParty,
    #[serde(rename = "enderToma", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Resolved payer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayerRole<'a> {
    /// 0: remetente.
    Sender,
    /// 1: expedidor.
    Shipper,
    /// 2: recebedor.
    Receiver,
    /// 3: destinatário.
    Recipient,
    /// 4: someone else, identified in `toma3`.
    Other(&'a OtherPayer),
}

impl PayerRole<'_> {
    /// Wire code of the role.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sender => "0",
            Self::Shipper => "1",
            Self::Receiver => "2",
            Self::Recipient => "3",
            Self::Other(_) => OTHER_PAYER_CODE,
        }
    }
}

impl Tomador {
    /// Resolve the role, enforcing that `toma3` is present exactly when the
    /// role is 4.
    pub fn resolve(&self) -> Result<PayerRole<'_>, ValidationError> {
        let role = match self.role.trim() {
            "0" => PayerRole::Sender,
            "1" => PayerRole::Shipper,
            "2" => PayerRole::Receiver,
            "3" => PayerRole::Recipient,
            OTHER_PAYER_CODE => {
                let other = self.other.as_ref().ok_or_else(|| {
                    ValidationError::new("toma.toma3", "is required when toma is 4")
                })?;
                return Ok(PayerRole::Other(other));
            }
            "" => return Err(ValidationError::missing("toma.toma")),
            unknown => {
                return Err(ValidationError::new(
                    "toma.toma",
                    format!("unknown payer role {unknown:?}; expected 0 to 4"),
                ));
            }
        };
        if self.other.is_some() {
            return Err(ValidationError::new(
                "toma.toma3",
                "is only allowed when toma is 4",
            ));
        }
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tomador(role: &str, other: bool) -> Tomador {
        Tomador {
            role: role.into(),
            other: other.then(OtherPayer::default),
        }
    }

    #[test]
    fn fixed_roles() {
        assert_eq!(tomador("0", false).resolve().unwrap(), PayerRole::Sender);
        assert_eq!(tomador("3", false).resolve().unwrap().code(), "3");
    }

    #[test]
    fn role_four_requires_toma3() {
        let err = tomador("4", false).resolve().unwrap_err();
        assert_eq!(err.field, "toma.toma3");
        let t = tomador("4", true);
        assert!(matches!(t.resolve().unwrap(), PayerRole::Other(_)));
    }

    #[test]
    fn toma3_forbidden_for_fixed_roles() {
        let err = tomador("1", true).resolve().unwrap_err();
        assert_eq!(err.message, "is only allowed when toma is 4");
    }

    #[test]
    fn unknown_role() {
        assert_eq!(tomador("7", false).resolve().unwrap_err().field, "toma.toma");
        assert_eq!(
            tomador("", false).resolve().unwrap_err(),
            ValidationError::missing("toma.toma")
        );
    }

    #[test]
    fn numeric_role_on_the_wire() {
        let t: Tomador = serde_json::from_str(r#"{"toma": 2}"#).unwrap();
        assert_eq!(t.resolve().unwrap(), PayerRole::Receiver);
    }
}
