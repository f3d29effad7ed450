use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{
    AuthorizationStatus, DfeError, Emitter, generate_access_key, serialize_issued_at,
};

use super::types::NfePayload;
use super::validate::validate_nfe_with;
use super::xml::to_nfe_xml;

/// Result of a successful NF-e emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfeAuthorization {
    pub status: AuthorizationStatus,
    /// The 44-digit access key.
    pub nfe_key: String,
    pub xml: String,
    #[serde(serialize_with = "serialize_issued_at")]
    pub issued_at: DateTime<Utc>,
    pub access_key_components: NfeKeyComponents,
}

/// Parts of the key a caller needs to echo back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfeKeyComponents {
    #[serde(rename = "cNF")]
    pub numeric_code: String,
    #[serde(rename = "digitoVerificador")]
    pub check_digit: String,
}

impl Emitter {
    /// Validate, key and encode an NF-e.
    pub fn emit_nfe(&self, payload: &NfePayload) -> Result<NfeAuthorization, DfeError> {
        let doc = validate_nfe_with(payload, self.config())?;
        let key = generate_access_key(&doc.key_fields(), self.code_source())?;
        let xml = to_nfe_xml(&doc, &key)?;
        tracing::debug!(key = %key, "NF-e authorized");

        Ok(NfeAuthorization {
            status: AuthorizationStatus::Authorized,
            access_key_components: NfeKeyComponents {
                numeric_code: key.numeric_code().to_owned(),
                check_digit: key.check_digit().to_owned(),
            },
            nfe_key: key.into_string(),
            xml,
            issued_at: self.now(),
        })
    }
}

/// Emit with a default [`Emitter`]: random numeric code, system clock.
pub fn emit_nfe(payload: &NfePayload) -> Result<NfeAuthorization, DfeError> {
    Emitter::default().emit_nfe(payload)
}
