use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{
    AuthorizationStatus, DfeError, Emitter, generate_access_key, serialize_issued_at,
};

use super::types::CtePayload;
use super::validate::validate_cte;
use super::xml::to_cte_xml_with;

/// Result of a successful CT-e emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CteAuthorization {
    pub status: AuthorizationStatus,
    /// The 44-digit access key.
    pub cte_key: String,
    pub xml: String,
    #[serde(serialize_with = "serialize_issued_at")]
    pub issued_at: DateTime<Utc>,
    pub access_key_components: CteKeyComponents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CteKeyComponents {
    #[serde(rename = "cCT")]
    pub numeric_code: String,
    #[serde(rename = "digitoVerificador")]
    pub check_digit: String,
}

impl Emitter {
    /// Validate, key and encode a CT-e.
    pub fn emit_cte(&self, payload: &CtePayload) -> Result<CteAuthorization, DfeError> {
        let doc = validate_cte(payload)?;
        let key = generate_access_key(&doc.key_fields(), self.code_source())?;
        let xml = to_cte_xml_with(&doc, &key, self.config())?;
        tracing::debug!(key = %key, modal = doc.modal.tag(), "CT-e authorized");

        Ok(CteAuthorization {
            status: AuthorizationStatus::Authorized,
            access_key_components: CteKeyComponents {
                numeric_code: key.numeric_code().to_owned(),
                check_digit: key.check_digit().to_owned(),
            },
            cte_key: key.into_string(),
            xml,
            issued_at: self.now(),
        })
    }
}

/// Emit with a default [`Emitter`].
pub fn emit_cte(payload: &CtePayload) -> Result<CteAuthorization, DfeError> {
    Emitter::default().emit_cte(payload)
}
