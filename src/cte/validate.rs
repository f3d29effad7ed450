//! Business-rule validation of a CT-e payload.

use crate::core::validation::{
    RuleResult, check_key_width, check_timestamp, ensure_digits, require, validate_address,
};
use crate::core::{Address, DfeError, KeyFields, ValidationError};

use super::modal::{ModalBlock, ModalCode, ModalInfo};
use super::payer::PayerRole;
use super::types::*;

/// A payload that passed [`validate_cte`], with the payer and transport
/// mode already resolved.
#[derive(Debug, Clone, Copy)]
pub struct ValidCte<'a> {
    pub ide: &'a CteIde,
    pub complement: Option<&'a Complement>,
    pub emit: &'a CteIssuer,
    pub issuer_address: &'a Address,
    pub sender: &'a CteSender,
    pub sender_address: &'a Address,
    pub recipient: &'a CteRecipient,
    pub recipient_address: &'a Address,
    pub payer: PayerRole<'a>,
    pub service: &'a ServiceValue,
    pub taxes: &'a CteTaxes,
    pub cargo: &'a CargoInfo,
    pub modal_info: &'a ModalInfo,
    pub modal: ModalBlock<'a>,
    pub authorized_viewers: &'a [AuthorizedViewer],
    pub technical_responsible: Option<&'a TechnicalResponsible>,
}

impl<'a> ValidCte<'a> {
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

/// Validate a CT-e payload, failing on the first rule it breaks.
pub fn validate_cte(payload: &CtePayload) -> Result<ValidCte<'_>, DfeError> {
    check(payload).map_err(|e| {
        tracing::debug!(field = %e.field, message = %e.message, "CT-e rejected");
        DfeError::Validation(e)
    })
}

fn check(payload: &CtePayload) -> RuleResult<ValidCte<'_>> {
    let ide = require(payload.ide.as_ref(), "ide")?;
    let emit = require(payload.emit.as_ref(), "emit")?;
    let sender = require(payload.sender.as_ref(), "rem")?;
    let recipient = require(payload.recipient.as_ref(), "dest")?;
    let tomador = require(payload.payer.as_ref(), "toma")?;
    let service = require(payload.service.as_ref(), "vPrest")?;
    let taxes = require(payload.taxes.as_ref(), "imp")?;
    let cargo = require(payload.cargo.as_ref(), "infCarga")?;
    let modal_info = require(payload.modal.as_ref(), "infModal")?;

    ensure_digits(&ide.state_code, "ide.cUF", Some(2))?;
    if let Some(code) = non_blank(ide.numeric_code.as_deref()) {
        ensure_digits(code, "ide.cCT", Some(8))?;
    }
    ensure_digits(&emit.cnpj, "emit.CNPJ", Some(14))?;
    ensure_digits(&emit.state_registration, "emit.IE", None)?;
    check_party_ids(&sender.party, "rem")?;
    check_party_ids(&recipient.party, "dest")?;

    check_key_width(&ide.model, "ide.mod", 2)?;
    check_key_width(&ide.series, "ide.serie", 3)?;
    check_key_width(&ide.number, "ide.nCT", 9)?;
    check_key_width(&ide.emission_type, "ide.tpEmis", 1)?;

    let issuer_address = validate_address(emit.address.as_ref(), "emit.enderEmit", false)?;
    let sender_address = validate_address(sender.address.as_ref(), "rem.enderReme", false)?;
    let recipient_address =
        validate_address(recipient.address.as_ref(), "dest.enderDest", false)?;

    let code = ModalCode::parse(&ide.modal).ok_or_else(|| {
        if ide.modal.trim().is_empty() {
            ValidationError::missing("ide.modal")
        } else {
            ValidationError::new(
                "ide.modal",
                format!("unknown modal code {:?}; expected 01 to 09", ide.modal),
            )
        }
    })?;
    let modal = modal_info.select(code)?;

    let payer = tomador.resolve()?;
    if let PayerRole::Other(other) = payer {
        check_party_ids(&other.party, "toma.toma3")?;
        validate_address(other.address.as_ref(), "toma.toma3.enderToma", false)?;
    }

    if service.components.is_empty() {
        return Err(ValidationError::new(
            "vPrest.component",
            "must contain at least one component",
        ));
    }
    if cargo.quantities.is_empty() {
        return Err(ValidationError::new(
            "infCarga.infQ",
            "must contain at least one quantity",
        ));
    }

    check_timestamp(&ide.emitted_at, "ide.dhEmi")?;

    for (index, viewer) in payload.authorized_viewers.iter().enumerate() {
        let path = format!("autXML[{index}]");
        match (non_blank(viewer.cnpj.as_deref()), non_blank(viewer.cpf.as_deref())) {
            (Some(cnpj), _) => {
                ensure_digits(cnpj, &format!("{path}.CNPJ"), Some(14))?;
            }
            (None, Some(cpf)) => {
                ensure_digits(cpf, &format!("{path}.CPF"), Some(11))?;
            }
            (None, None) => {
                return Err(ValidationError::new(path, "CNPJ or CPF is required"));
            }
        }
    }

    let technical_responsible = payload
        .protocol
        .as_ref()
        .and_then(|p| p.technical_responsible.as_ref());
    if let Some(resp) = technical_responsible {
        ensure_digits(&resp.cnpj, "prot.infRespTec.CNPJ", Some(14))?;
    }

    Ok(ValidCte {
        ide,
        complement: payload.complement.as_ref(),
        emit,
        issuer_address,
        sender,
        sender_address,
        recipient,
        recipient_address,
        payer,
        service,
        taxes,
        cargo,
        modal_info,
        modal,
        authorized_viewers: &payload.authorized_viewers,
        technical_responsible,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_party_ids(party: &CteParty, path: &str) -> RuleResult {
    if let Some(cnpj) = non_blank(party.cnpj.as_deref()) {
        ensure_digits(cnpj, &format!("{path}.CNPJ"), Some(14))?;
    }
    if let Some(cpf) = non_blank(party.cpf.as_deref()) {
        ensure_digits(cpf, &format!("{path}.CPF"), Some(11))?;
    }
    Ok(())
}
