//! Business-rule validation of an NF-e payload.
//!
//! Rules run in a fixed order and the first violation is returned.

use crate::core::validation::{
    RuleResult, check_key_width, check_timestamp, ensure_digits, is_blank, require, require_text,
    validate_address,
};
use crate::core::{Address, DfeError, EmitterConfig, KeyFields, ValidationError};

use super::types::*;

/// A payload that passed [`validate_nfe`]: every mandatory section is
/// present and borrowed from the original payload.
#[derive(Debug, Clone, Copy)]
pub struct ValidNfe<'a> {
    pub ide: &'a NfeIde,
    pub emit: &'a NfeIssuer,
    pub issuer_address: &'a Address,
    pub dest: &'a NfeRecipient,
    pub recipient_address: &'a Address,
    pub items: &'a [NfeItem],
    pub transp: &'a Transport,
    pub pag: &'a Payment,
    pub additional_info: Option<&'a AdditionalInfo>,
    pub total_overrides: Option<&'a TotalOverrides>,
}

impl<'a> ValidNfe<'a> {
    /// Inputs of the access key.
    pub fn key_fields(&self) -> KeyFields<'a> {
        KeyFields {
            state_code: &self.ide.state_code,
            emitted_at: &self.ide.emitted_at,
            issuer_cnpj: &self.emit.cnpj,
            model: &self.ide.model,
            series: &self.ide.series,
            number: &self.ide.number,
            emission_type: &self.ide.emission_type,
            numeric_code: self.ide.numeric_code.as_deref(),
        }
    }
}

/// Validate with the default [`EmitterConfig`].
pub fn validate_nfe(payload: &NfePayload) -> Result<ValidNfe<'_>, DfeError> {
    validate_nfe_with(payload, &EmitterConfig::default())
}

/// Validate an NF-e payload, failing on the first rule it breaks.
pub fn validate_nfe_with<'a>(
    payload: &'a NfePayload,
    config: &EmitterConfig,
) -> Result<ValidNfe<'a>, DfeError> {
    check(payload, config).map_err(|e| {
        tracing::debug!(field = %e.field, message = %e.message, "NF-e rejected");
        DfeError::Validation(e)
    })
}

fn check<'a>(payload: &'a NfePayload, config: &EmitterConfig) -> RuleResult<ValidNfe<'a>> {
    // Required sections
    let ide = require(payload.ide.as_ref(), "ide")?;

    let emit = require(payload.emit.as_ref(), "emit")?;
    require_text(&emit.cnpj, "emit.CNPJ")?;
    require_text(&emit.name, "emit.xNome")?;
    require_text(&emit.state_registration, "emit.IE")?;

    let dest = require(payload.dest.as_ref(), "dest")?;
    require_text(&dest.name, "dest.xNome")?;
    if is_blank(dest.cnpj.as_deref())
        && is_blank(dest.cpf.as_deref())
        && is_blank(dest.foreign_id.as_deref())
    {
        return Err(ValidationError::new(
            "dest",
            "one of CNPJ, CPF or idEstrangeiro is required",
        ));
    }

    if payload.items.is_empty() {
        return Err(ValidationError::new("items", "must contain at least one item"));
    }

    let transp = require(payload.transp.as_ref(), "transp")?;
    require_text(&transp.freight_mode, "transp.modFrete")?;

    let pag = require(payload.pag.as_ref(), "pag")?;
    if pag.details.is_empty() {
        return Err(ValidationError::new(
            "pag.detPag",
            "must contain at least one entry",
        ));
    }

    // Tax IDs and codes
    ensure_digits(&ide.state_code, "ide.cUF", Some(2))?;
    ensure_digits(&emit.cnpj, "emit.CNPJ", Some(14))?;
    if let Some(cnpj) = dest.cnpj.as_deref().filter(|v| !v.trim().is_empty()) {
        ensure_digits(cnpj, "dest.CNPJ", Some(14))?;
    }
    if let Some(cpf) = dest.cpf.as_deref().filter(|v| !v.trim().is_empty()) {
        ensure_digits(cpf, "dest.CPF", Some(11))?;
    }
    if let Some(code) = ide.numeric_code.as_deref().filter(|v| !v.trim().is_empty()) {
        check_key_width(code, "ide.cNF", 8)?;
    }

    // Access key slots
    check_key_width(&ide.model, "ide.mod", 2)?;
    check_key_width(&ide.series, "ide.serie", 3)?;
    check_key_width(&ide.number, "ide.nNF", 9)?;
    check_key_width(&ide.emission_type, "ide.tpEmis", 1)?;

    let issuer_address = validate_address(emit.address.as_ref(), "emit.enderEmit", true)?;
    let recipient_address = validate_address(dest.address.as_ref(), "dest.enderDest", true)?;

    check_timestamp(&ide.emitted_at, "ide.dhEmi")?;

    if payload.items.len() > config.max_items {
        return Err(ValidationError::new(
            "items",
            format!("must not contain more than {} items", config.max_items),
        ));
    }
    for (index, item) in payload.items.iter().enumerate() {
        check_item(item, index)?;
    }

    Ok(ValidNfe {
        ide,
        emit,
        issuer_address,
        dest,
        recipient_address,
        items: &payload.items,
        transp,
        pag,
        additional_info: payload.additional_info.as_ref(),
        total_overrides: payload.total_overrides.as_ref(),
    })
}

fn check_item(item: &NfeItem, index: usize) -> RuleResult {
    let prefix = format!("items[{index}].prod");
    let prod = &item.product;

    require_text(&prod.code, &format!("{prefix}.cProd"))?;
    require_text(&prod.description, &format!("{prefix}.xProd"))?;
    if prod.total.as_ref().is_none_or(|v| v.is_blank()) {
        return Err(ValidationError::missing(format!("{prefix}.vProd")));
    }
    if !matches!(prod.total_indicator.as_str(), "0" | "1") {
        return Err(ValidationError::new(
            format!("{prefix}.indTot"),
            format!(r#"must be "0" or "1", got {:?}"#, prod.total_indicator),
        ));
    }
    Ok(())
}
