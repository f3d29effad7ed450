use crate::core::*;

use super::CTE_NAMESPACE;
use super::modal::ModalBlock;
use super::payer::PayerRole;
use super::types::*;
use super::validate::ValidCte;

/// Layout version written on `infCte`.
pub const CTE_VERSION: &str = "4.00";

/// Encode a validated CT-e with the default [`EmitterConfig`].
pub fn to_cte_xml(doc: &ValidCte<'_>, key: &AccessKey) -> XmlResult {
    to_cte_xml_with(doc, key, &EmitterConfig::default())
}

/// Encode a validated CT-e as layout 4.00 XML.
///
/// `infModal` carries the payload's `versaoModal`, or the configured default
/// when absent.
pub fn to_cte_xml_with(doc: &ValidCte<'_>, key: &AccessKey, config: &EmitterConfig) -> XmlResult {
    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs("CTe", &[("xmlns", CTE_NAMESPACE)])?;
    let id = format!("CTe{key}");
    w.start_element_with_attrs("infCte", &[("Id", id.as_str()), ("versao", CTE_VERSION)])?;

    write_ide(&mut w, doc.ide, key)?;
    if let Some(compl) = doc.complement {
        write_compl(&mut w, compl)?;
    }
    write_emit(&mut w, doc.emit, doc.issuer_address)?;
    write_party(&mut w, "rem", &doc.sender.party, "enderReme", Some(doc.sender_address))?;
    write_party(&mut w, "dest", &doc.recipient.party, "enderDest", Some(doc.recipient_address))?;
    write_toma(&mut w, doc.payer)?;
    write_vprest(&mut w, doc.service)?;
    write_imp(&mut w, doc.taxes)?;
    write_inf_carga(&mut w, doc.cargo)?;

    let version = doc
        .modal_info
        .version
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(config.default_modal_version.as_str());
    write_inf_modal(&mut w, doc.modal, version)?;

    for viewer in doc.authorized_viewers {
        w.start_element("autXML")?;
        w.opt_text_element("CNPJ", viewer.cnpj.as_deref().map(only_digits).as_deref())?;
        w.opt_text_element("CPF", viewer.cpf.as_deref().map(only_digits).as_deref())?;
        w.end_element("autXML")?;
    }
    if let Some(resp) = doc.technical_responsible {
        w.start_element("infRespTec")?;
        w.text_element("CNPJ", &only_digits(&resp.cnpj))?;
        w.text_element("xContato", &resp.contact)?;
        w.text_element("email", &resp.email)?;
        w.opt_text_element("fone", resp.phone.as_deref())?;
        w.end_element("infRespTec")?;
    }

    w.end_element("infCte")?;
    w.end_element("CTe")?;
    let xml = w.into_string()?;
    tracing::debug!(key = %key, bytes = xml.len(), "CT-e encoded");
    Ok(xml)
}

fn write_ide(w: &mut XmlWriter, ide: &CteIde, key: &AccessKey) -> Result<(), DfeError> {
    w.start_element("ide")?;
    w.text_element("cUF", &pad_left(only_digits(&ide.state_code), 2))?;
    w.text_element("cCT", key.numeric_code())?;
    w.text_element("CFOP", &ide.cfop)?;
    w.text_element("natOp", &ide.operation_nature)?;
    w.text_element("mod", &pad_left(&ide.model, 2))?;
    w.text_element("serie", &pad_left(&ide.series, 3))?;
    w.text_element("nCT", &pad_left(&ide.number, 9))?;
    w.text_element("dhEmi", &ide.emitted_at)?;
    w.text_element("tpImp", &ide.print_format)?;
    w.text_element("tpEmis", &ide.emission_type)?;
    w.text_element("cDV", key.check_digit())?;
    w.text_element("tpAmb", &ide.environment)?;
    w.text_element("tpCTe", &ide.cte_type)?;
    w.text_element("procEmi", &ide.process)?;
    w.text_element("verProc", &ide.process_version)?;
    w.text_element("cMunEnv", &ide.sending_municipality_code)?;
    w.text_element("xMunEnv", &ide.sending_municipality)?;
    w.text_element("UFEnv", &ide.sending_state)?;
    w.text_element("modal", &ide.modal)?;
    w.text_element("tpServ", &ide.service_type)?;
    w.text_element("indIEToma", &ide.payer_registration_indicator)?;
    w.end_element("ide")?;
    Ok(())
}

fn write_compl(w: &mut XmlWriter, compl: &Complement) -> Result<(), DfeError> {
    let observations = compl.observations.as_deref().filter(|s| !s.is_empty());
    if observations.is_none() && compl.taxpayer_notes.is_empty() {
        return Ok(());
    }
    w.start_element("compl")?;
    w.opt_text_element("xObs", observations)?;
    for note in &compl.taxpayer_notes {
        w.start_element("ObsCont")?;
        w.opt_text_element("xCampo", note.field.as_deref())?;
        w.text_element("xTexto", &note.text)?;
        w.end_element("ObsCont")?;
    }
    w.end_element("compl")?;
    Ok(())
}

fn write_emit(w: &mut XmlWriter, emit: &CteIssuer, address: &Address) -> Result<(), DfeError> {
    w.start_element("emit")?;
    w.text_element("CNPJ", &only_digits(&emit.cnpj))?;
    w.text_element("IE", &only_digits(&emit.state_registration))?;
    w.text_element("xNome", &emit.name)?;
    w.opt_text_element("xFant", emit.trade_name.as_deref())?;
    w.address_element("enderEmit", address)?;
    w.end_element("emit")?;
    Ok(())
}

fn write_party(
    w: &mut XmlWriter,
    tag: &str,
    party: &CteParty,
    address_tag: &str,
    address: Option<&Address>,
) -> Result<(), DfeError> {
    w.start_element(tag)?;
    w.opt_text_element("CNPJ", party.cnpj.as_deref().map(only_digits).as_deref())?;
    w.opt_text_element("CPF", party.cpf.as_deref().map(only_digits).as_deref())?;
    w.opt_text_element("IE", party.state_registration.as_deref())?;
    w.text_element("xNome", &party.name)?;
    w.opt_text_element("fone", party.phone.as_deref())?;
    if let Some(address) = address {
        w.address_element(address_tag, address)?;
    }
    w.end_element(tag)?;
    Ok(())
}

fn write_toma(w: &mut XmlWriter, payer: PayerRole<'_>) -> Result<(), DfeError> {
    w.start_element("toma")?;
    w.text_element("toma", payer.code())?;
    if let PayerRole::Other(other) = payer {
        write_party(w, "toma3", &other.party, "enderToma", other.address.as_ref())?;
    }
    w.end_element("toma")?;
    Ok(())
}

fn write_vprest(w: &mut XmlWriter, service: &ServiceValue) -> Result<(), DfeError> {
    w.start_element("vPrest")?;
    w.opt_numeric_element("vTPrest", service.total.as_ref(), 2)?;
    w.opt_numeric_element("vRec", service.receivable.as_ref(), 2)?;
    for comp in &service.components {
        w.start_element("comp")?;
        w.text_element("xNome", &comp.name)?;
        w.opt_numeric_element("vComp", comp.value.as_ref(), 2)?;
        w.end_element("comp")?;
    }
    w.end_element("vPrest")?;
    Ok(())
}

fn write_imp(w: &mut XmlWriter, taxes: &CteTaxes) -> Result<(), DfeError> {
    w.start_element("imp")?;
    if let Some(icms) = &taxes.icms {
        w.map_element("ICMS", icms)?;
    }
    w.opt_text_element("infAdFisco", taxes.fiscal_info.as_deref())?;
    w.end_element("imp")?;
    Ok(())
}

fn write_inf_carga(w: &mut XmlWriter, cargo: &CargoInfo) -> Result<(), DfeError> {
    w.start_element("infCarga")?;
    w.opt_numeric_element("vCarga", cargo.value.as_ref(), 2)?;
    w.text_element("proPred", &cargo.predominant_product)?;
    w.opt_text_element("xOutCat", cargo.other_characteristics.as_deref())?;
    for q in &cargo.quantities {
        w.start_element("infQ")?;
        w.text_element("cUnid", &q.unit)?;
        w.text_element("tpMed", &q.measure)?;
        w.opt_numeric_element("qCarga", q.quantity.as_ref(), 3)?;
        w.end_element("infQ")?;
    }
    w.end_element("infCarga")?;
    Ok(())
}

fn write_inf_modal(w: &mut XmlWriter, modal: ModalBlock<'_>, version: &str) -> Result<(), DfeError> {
    w.start_element_with_attrs("infModal", &[("versaoModal", version)])?;
    match modal {
        ModalBlock::Road(road) => {
            w.start_element("rodo")?;
            w.text_element("RNTRC", &road.rntrc)?;
            w.end_element("rodo")?;
        }
        ModalBlock::Air(block)
        | ModalBlock::Waterway(block)
        | ModalBlock::Rail(block)
        | ModalBlock::Pipeline(block)
        | ModalBlock::Multimodal(block) => {
            w.map_element(modal.tag(), block)?;
        }
    }
    w.end_element("infModal")?;
    Ok(())
}
