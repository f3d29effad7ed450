use crate::core::*;

use super::NFE_NAMESPACE;
use super::totals::compute_totals;
use super::types::*;
use super::validate::ValidNfe;

/// Layout version written on `infNFe`.
pub const NFE_VERSION: &str = "4.00";

/// Encode a validated NF-e as layout 4.00 XML.
///
/// `key` supplies the `Id` attribute, `cNF` and `cDV`. The only failure after
/// validation is a numeric field that does not parse.
pub fn to_nfe_xml(doc: &ValidNfe<'_>, key: &AccessKey) -> XmlResult {
    // Totals go first so that a bad number aborts before anything is written.
    let totals = compute_totals(doc.items, doc.total_overrides)?;

    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs("NFe", &[("xmlns", NFE_NAMESPACE)])?;
    let id = format!("NFe{key}");
    w.start_element_with_attrs("infNFe", &[("Id", id.as_str()), ("versao", NFE_VERSION)])?;

    write_ide(&mut w, doc.ide, key)?;
    write_emit(&mut w, doc.emit, doc.issuer_address)?;
    write_dest(&mut w, doc.dest, doc.recipient_address)?;
    for (index, item) in doc.items.iter().enumerate() {
        let n_item = (index + 1).to_string();
        w.start_element_with_attrs("det", &[("nItem", n_item.as_str())])?;
        write_prod(&mut w, &item.product)?;
        write_imposto(&mut w, &item.taxes)?;
        w.end_element("det")?;
    }
    totals.write(&mut w)?;
    write_transp(&mut w, doc.transp)?;
    write_pag(&mut w, doc.pag)?;
    if let Some(info) = doc.additional_info {
        write_inf_adic(&mut w, info)?;
    }

    w.end_element("infNFe")?;
    w.end_element("NFe")?;
    let xml = w.into_string()?;
    tracing::debug!(key = %key, bytes = xml.len(), "NF-e encoded");
    Ok(xml)
}

fn write_ide(w: &mut XmlWriter, ide: &NfeIde, key: &AccessKey) -> Result<(), DfeError> {
    w.start_element("ide")?;
    w.text_element("cUF", &pad_left(only_digits(&ide.state_code), 2))?;
    w.text_element("cNF", key.numeric_code())?;
    w.text_element("natOp", &ide.operation_nature)?;
    w.text_element("mod", &pad_left(&ide.model, 2))?;
    w.text_element("serie", &pad_left(&ide.series, 3))?;
    w.text_element("nNF", &pad_left(&ide.number, 9))?;
    w.text_element("dhEmi", &ide.emitted_at)?;
    w.opt_text_element("dhSaiEnt", ide.departure_at.as_deref())?;
    w.text_element("tpNF", &ide.operation_type)?;
    w.text_element("idDest", &ide.destination)?;
    w.text_element("cMunFG", &ide.municipality_code)?;
    w.text_element("tpImp", &ide.print_format)?;
    w.text_element("tpEmis", &ide.emission_type)?;
    w.text_element("cDV", key.check_digit())?;
    w.text_element("tpAmb", &ide.environment)?;
    w.text_element("finNFe", &ide.purpose)?;
    w.text_element("indFinal", &ide.final_consumer)?;
    w.text_element("indPres", &ide.presence)?;
    w.opt_text_element("indIntermed", ide.intermediary.as_deref())?;
    w.text_element("procEmi", &ide.process)?;
    w.text_element("verProc", &ide.process_version)?;
    for reference in &ide.references {
        w.start_element("NFref")?;
        w.text_element("refNFe", reference)?;
        w.end_element("NFref")?;
    }
    w.end_element("ide")?;
    Ok(())
}

fn write_emit(w: &mut XmlWriter, emit: &NfeIssuer, address: &Address) -> Result<(), DfeError> {
    w.start_element("emit")?;
    w.text_element("CNPJ", &only_digits(&emit.cnpj))?;
    w.text_element("xNome", &emit.name)?;
    w.opt_text_element("xFant", emit.trade_name.as_deref())?;
    w.address_element("enderEmit", address)?;
    w.text_element("IE", &emit.state_registration)?;
    w.opt_text_element("IEST", emit.substitute_registration.as_deref())?;
    w.opt_text_element("IM", emit.municipal_registration.as_deref())?;
    w.opt_text_element("CNAE", emit.cnae.as_deref())?;
    w.text_element("CRT", &emit.tax_regime)?;
    w.end_element("emit")?;
    Ok(())
}

fn write_dest(
    w: &mut XmlWriter,
    dest: &NfeRecipient,
    address: &Address,
) -> Result<(), DfeError> {
    w.start_element("dest")?;
    w.opt_text_element("CNPJ", dest.cnpj.as_deref().map(only_digits).as_deref())?;
    w.opt_text_element("CPF", dest.cpf.as_deref().map(only_digits).as_deref())?;
    w.opt_text_element("idEstrangeiro", dest.foreign_id.as_deref())?;
    w.text_element("xNome", &dest.name)?;
    w.address_element("enderDest", address)?;
    w.text_element("indIEDest", &dest.registration_indicator)?;
    w.opt_text_element("IE", dest.state_registration.as_deref())?;
    w.opt_text_element("ISUF", dest.suframa.as_deref())?;
    w.opt_text_element("IM", dest.municipal_registration.as_deref())?;
    w.opt_text_element("email", dest.email.as_deref())?;
    w.end_element("dest")?;
    Ok(())
}

fn write_prod(w: &mut XmlWriter, prod: &Product) -> Result<(), DfeError> {
    w.start_element("prod")?;
    w.text_element("cProd", &prod.code)?;
    w.text_element("cEAN", &prod.gtin)?;
    w.text_element("xProd", &prod.description)?;
    w.text_element("NCM", &prod.ncm)?;
    w.opt_text_element("CEST", prod.cest.as_deref())?;
    w.text_element("CFOP", &prod.cfop)?;
    w.text_element("uCom", &prod.unit)?;
    w.opt_numeric_element("qCom", prod.quantity.as_ref(), 4)?;
    w.opt_numeric_element("vUnCom", prod.unit_value.as_ref(), 10)?;
    w.opt_numeric_element("vProd", prod.total.as_ref(), 2)?;
    w.text_element("cEANTrib", &prod.taxable_gtin)?;
    w.text_element("uTrib", &prod.taxable_unit)?;
    w.opt_numeric_element("qTrib", prod.taxable_quantity.as_ref(), 4)?;
    w.opt_numeric_element("vUnTrib", prod.taxable_unit_value.as_ref(), 10)?;
    w.opt_numeric_element("vFrete", prod.freight.as_ref(), 2)?;
    w.opt_numeric_element("vSeg", prod.insurance.as_ref(), 2)?;
    w.opt_numeric_element("vDesc", prod.discount.as_ref(), 2)?;
    w.opt_numeric_element("vOutro", prod.other.as_ref(), 2)?;
    w.text_element("indTot", &prod.total_indicator)?;
    w.opt_text_element("xPed", prod.order_number.as_deref())?;
    w.opt_text_element("nItemPed", prod.order_item.as_deref())?;
    w.opt_text_element("infAdProd", prod.additional_info.as_deref())?;
    w.end_element("prod")?;
    Ok(())
}

fn write_imposto(w: &mut XmlWriter, taxes: &ItemTaxes) -> Result<(), DfeError> {
    w.start_element("imposto")?;
    w.opt_numeric_element("vTotTrib", taxes.approximate_total.as_ref(), 2)?;
    let groups = [
        ("ICMS", &taxes.icms),
        ("IPI", &taxes.ipi),
        ("II", &taxes.import_tax),
        ("PIS", &taxes.pis),
        ("COFINS", &taxes.cofins),
        ("ISSQN", &taxes.issqn),
    ];
    for (tag, group) in groups {
        if let Some(group) = group {
            w.map_element(tag, group)?;
        }
    }
    w.end_element("imposto")?;
    Ok(())
}

fn write_transp(w: &mut XmlWriter, transp: &Transport) -> Result<(), DfeError> {
    w.start_element("transp")?;
    w.text_element("modFrete", &transp.freight_mode)?;
    if let Some(carrier) = &transp.carrier {
        w.start_element("transporta")?;
        w.opt_text_element("CNPJ", carrier.cnpj.as_deref().map(only_digits).as_deref())?;
        w.opt_text_element("CPF", carrier.cpf.as_deref().map(only_digits).as_deref())?;
        w.opt_text_element("xNome", carrier.name.as_deref())?;
        w.opt_text_element("IE", carrier.state_registration.as_deref())?;
        w.opt_text_element("xEnder", carrier.address.as_deref())?;
        w.opt_text_element("xMun", carrier.municipality.as_deref())?;
        w.opt_text_element("UF", carrier.state.as_deref())?;
        w.end_element("transporta")?;
    }
    for vol in &transp.volumes {
        w.start_element("vol")?;
        w.opt_numeric_element("qVol", vol.quantity.as_ref(), 0)?;
        w.opt_text_element("esp", vol.species.as_deref())?;
        w.opt_text_element("marca", vol.brand.as_deref())?;
        w.opt_text_element("nVol", vol.numbering.as_deref())?;
        w.opt_numeric_element("pesoL", vol.net_weight.as_ref(), 3)?;
        w.opt_numeric_element("pesoB", vol.gross_weight.as_ref(), 3)?;
        w.end_element("vol")?;
    }
    w.end_element("transp")?;
    Ok(())
}

fn write_pag(w: &mut XmlWriter, pag: &Payment) -> Result<(), DfeError> {
    w.start_element("pag")?;
    for detail in &pag.details {
        w.start_element("detPag")?;
        w.opt_text_element("indPag", detail.indicator.as_deref())?;
        w.text_element("tPag", &detail.method)?;
        w.opt_numeric_element("vPag", detail.amount.as_ref(), 2)?;
        if let Some(card) = &detail.card {
            w.start_element("card")?;
            w.text_element("tpIntegra", &card.integration)?;
            w.opt_text_element("CNPJ", card.cnpj.as_deref().map(only_digits).as_deref())?;
            w.opt_text_element("tBand", card.brand.as_deref())?;
            w.opt_text_element("cAut", card.authorization.as_deref())?;
            w.end_element("card")?;
        }
        w.end_element("detPag")?;
    }
    w.opt_numeric_element("vTroco", pag.change.as_ref(), 2)?;
    w.end_element("pag")?;
    Ok(())
}

fn write_inf_adic(w: &mut XmlWriter, info: &AdditionalInfo) -> Result<(), DfeError> {
    let fiscal = info.fiscal.as_deref().filter(|s| !s.is_empty());
    let complementary = info.complementary.as_deref().filter(|s| !s.is_empty());
    if fiscal.is_none() && complementary.is_none() {
        return Ok(());
    }
    w.start_element("infAdic")?;
    w.opt_text_element("infAdFisco", fiscal)?;
    w.opt_text_element("infCpl", complementary)?;
    w.end_element("infAdic")?;
    Ok(())
}
