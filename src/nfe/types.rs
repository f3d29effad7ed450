use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{Address, FieldMap, Numeric, string_or_number};

/// Explicit `ICMSTot` values keyed by tag (`vBC`, `vICMS`, ...). Each entry
/// replaces the computed default.
pub type TotalOverrides = BTreeMap<String, Numeric>;

/// An NF-e (modelo 55) as submitted for emission.
///
/// Top-level sections are optional so that a missing one is reported by the
/// validator with its wire path instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NfePayload {
    /// `ide`: identification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ide: Option<NfeIde>,
    /// `emit`: issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit: Option<NfeIssuer>,
    /// `dest`: recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest: Option<NfeRecipient>,
    /// `det` entries, in document order.
    #[serde(default)]
    pub items: Vec<NfeItem>,
    /// `transp`: transport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transp: Option<Transport>,
    /// `pag`: payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pag: Option<Payment>,
    /// `infAdic`: additional information.
    #[serde(rename = "infAdic", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfo>,
    #[serde(rename = "totalOverrides", skip_serializing_if = "Option::is_none")]
    pub total_overrides: Option<TotalOverrides>,
}

/// `ide` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NfeIde {
    /// `cUF`: IBGE state code.
    #[serde(rename = "cUF", default)]
    pub state_code: String,
    /// `cNF`: numeric code; generated when absent.
    #[serde(rename = "cNF", default, skip_serializing_if = "Option::is_none")]
    pub numeric_code: Option<String>,
    /// `natOp`: nature of the operation.
    #[serde(rename = "natOp", default)]
    pub operation_nature: String,
    /// `mod`: document model (55 or 65).
    #[serde(rename = "mod", default)]
    pub model: String,
    #[serde(rename = "serie", default, deserialize_with = "string_or_number")]
    pub series: String,
    #[serde(rename = "nNF", default, deserialize_with = "string_or_number")]
    pub number: String,
    /// `dhEmi`: emission timestamp.
    #[serde(rename = "dhEmi", default)]
    pub emitted_at: String,
    /// `dhSaiEnt`: departure or arrival timestamp.
    #[serde(rename = "dhSaiEnt", default, skip_serializing_if = "Option::is_none")]
    pub departure_at: Option<String>,
    /// `tpNF`: 0 inbound, 1 outbound.
    #[serde(rename = "tpNF", default)]
    pub operation_type: String,
    /// `idDest`: internal, interstate or foreign destination.
    #[serde(rename = "idDest", default)]
    pub destination: String,
    /// `cMunFG`: municipality of the taxable event.
    #[serde(rename = "cMunFG", default)]
    pub municipality_code: String,
    /// `tpImp`: DANFE print format.
    #[serde(rename = "tpImp", default)]
    pub print_format: String,
    /// `tpEmis`: emission type.
    #[serde(rename = "tpEmis", default)]
    pub emission_type: String,
    /// `tpAmb`: 1 production, 2 homologation.
    #[serde(rename = "tpAmb", default)]
    pub environment: String,
    /// `finNFe`: purpose.
    #[serde(rename = "finNFe", default)]
    pub purpose: String,
    /// `indFinal`: final consumer flag.
    #[serde(rename = "indFinal", default)]
    pub final_consumer: String,
    /// `indPres`: buyer presence.
    #[serde(rename = "indPres", default)]
    pub presence: String,
    /// `indIntermed`: intermediary indicator.
    #[serde(rename = "indIntermed", default, skip_serializing_if = "Option::is_none")]
    pub intermediary: Option<String>,
    /// `procEmi`: emission process.
    #[serde(rename = "procEmi", default)]
    pub process: String,
    /// `verProc`: version of the emitting application.
    #[serde(rename = "verProc", default)]
    pub process_version: String,
    /// `NFref`: access keys of referenced NF-e.
    #[serde(rename = "NFref", default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

/// `emit` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NfeIssuer {
    #[serde(rename = "CNPJ", default)]
    pub cnpj: String,
    /// `xNome`: legal name.
    #[serde(rename = "xNome", default)]
    pub name: String,
    /// `xFant`: trade name.
    #[serde(rename = "xFant", default, skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
    #[serde(rename = "enderEmit", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// `IE`: state registration.
    #[serde(rename = "IE", default)]
    pub state_registration: String,
    /// `IEST`: state registration as tax substitute.
    #[serde(rename = "IEST", default, skip_serializing_if = "Option::is_none")]
    pub substitute_registration: Option<String>,
    /// `IM`: municipal registration.
    #[serde(rename = "IM", default, skip_serializing_if = "Option::is_none")]
    pub municipal_registration: Option<String>,
    #[serde(rename = "CNAE", default, skip_serializing_if = "Option::is_none")]
    pub cnae: Option<String>,
    /// `CRT`: tax regime code.
    #[serde(rename = "CRT", default)]
    pub tax_regime: String,
}

/// `dest` block. One of `CNPJ`, `CPF` or `idEstrangeiro` identifies the
/// recipient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NfeRecipient {
    #[serde(rename = "CNPJ", default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(rename = "CPF", default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "idEstrangeiro", default, skip_serializing_if = "Option::is_none")]
    pub foreign_id: Option<String>,
    #[serde(rename = "xNome", default)]
    pub name: String,
    #[serde(rename = "enderDest", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// `indIEDest`: state registration indicator.
    #[serde(rename = "indIEDest", default)]
    pub registration_indicator: String,
    #[serde(rename = "IE", default, skip_serializing_if = "Option::is_none")]
    pub state_registration: Option<String>,
    /// `ISUF`: SUFRAMA registration.
    #[serde(rename = "ISUF", default, skip_serializing_if = "Option::is_none")]
    pub suframa: Option<String>,
    #[serde(rename = "IM", default, skip_serializing_if = "Option::is_none")]
    pub municipal_registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A `det` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NfeItem {
    #[serde(rename = "prod", default)]
    pub product: Product,
    #[serde(rename = "imposto", default)]
    pub taxes: ItemTaxes,
}

/// `prod` block of an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "cProd", default)]
    pub code: String,
    /// `cEAN`: GTIN, or `SEM GTIN`.
    #[serde(rename = "cEAN", default)]
    pub gtin: String,
    #[serde(rename = "xProd", default)]
    pub description: String,
    #[serde(rename = "NCM", default)]
    pub ncm: String,
    #[serde(rename = "CEST", default, skip_serializing_if = "Option::is_none")]
    pub cest: Option<String>,
    #[serde(rename = "CFOP", default)]
    pub cfop: String,
    /// `uCom`: commercial unit.
    #[serde(rename = "uCom", default)]
    pub unit: String,
    /// `qCom`: commercial quantity, 4 decimals.
    #[serde(rename = "qCom", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Numeric>,
    /// `vUnCom`: commercial unit value, 10 decimals.
    #[serde(rename = "vUnCom", default, skip_serializing_if = "Option::is_none")]
    pub unit_value: Option<Numeric>,
    /// `vProd`: gross item value.
    #[serde(rename = "vProd", default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Numeric>,
    #[serde(rename = "cEANTrib", default)]
    pub taxable_gtin: String,
    /// `uTrib`: taxable unit.
    #[serde(rename = "uTrib", default)]
    pub taxable_unit: String,
    /// `qTrib`: taxable quantity, 4 decimals.
    #[serde(rename = "qTrib", default, skip_serializing_if = "Option::is_none")]
    pub taxable_quantity: Option<Numeric>,
    /// `vUnTrib`: taxable unit value, 10 decimals.
    #[serde(rename = "vUnTrib", default, skip_serializing_if = "Option::is_none")]
    pub taxable_unit_value: Option<Numeric>,
    #[serde(rename = "vFrete", default, skip_serializing_if = "Option::is_none")]
    pub freight: Option<Numeric>,
    #[serde(rename = "vSeg", default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Numeric>,
    #[serde(rename = "vDesc", default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Numeric>,
    #[serde(rename = "vOutro", default, skip_serializing_if = "Option::is_none")]
    pub other: Option<Numeric>,
    /// `indTot`: "1" if `vProd` counts toward the invoice total, else "0".
    #[serde(rename = "indTot", default)]
    pub total_indicator: String,
    /// `xPed`: purchase order number.
    #[serde(rename = "xPed", default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(rename = "nItemPed", default, skip_serializing_if = "Option::is_none")]
    pub order_item: Option<String>,
    #[serde(rename = "infAdProd", default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// `imposto` block of an item. Each tax group is an open-ended mapping
/// whose layout depends on the tax situation (`ICMS00`, `PISAliq`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemTaxes {
    /// `vTotTrib`: approximate tax burden.
    #[serde(rename = "vTotTrib", default, skip_serializing_if = "Option::is_none")]
    pub approximate_total: Option<Numeric>,
    #[serde(rename = "ICMS", default, skip_serializing_if = "Option::is_none")]
    pub icms: Option<FieldMap>,
    #[serde(rename = "IPI", default, skip_serializing_if = "Option::is_none")]
    pub ipi: Option<FieldMap>,
    #[serde(rename = "II", default, skip_serializing_if = "Option::is_none")]
    pub import_tax: Option<FieldMap>,
    #[serde(rename = "PIS", default, skip_serializing_if = "Option::is_none")]
    pub pis: Option<FieldMap>,
    #[serde(rename = "COFINS", default, skip_serializing_if = "Option::is_none")]
    pub cofins: Option<FieldMap>,
    #[serde(rename = "ISSQN", default, skip_serializing_if = "Option::is_none")]
    pub issqn: Option<FieldMap>,
}

/// `transp` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    /// `modFrete`: who pays the freight.
    #[serde(rename = "modFrete", default)]
    pub freight_mode: String,
    #[serde(rename = "transporta", default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<Carrier>,
    #[serde(rename = "vol", default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
}

/// `transporta`: every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    #[serde(rename = "CNPJ", default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(rename = "CPF", default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "xNome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "IE", default, skip_serializing_if = "Option::is_none")]
    pub state_registration: Option<String>,
    #[serde(rename = "xEnder", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "xMun", default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(rename = "UF", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// `vol` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// `qVol`: integer count.
    #[serde(rename = "qVol", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Numeric>,
    /// `esp`: species (boxes, pallets, ...).
    #[serde(rename = "esp", default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(rename = "marca", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(rename = "nVol", default, skip_serializing_if = "Option::is_none")]
    pub numbering: Option<String>,
    /// `pesoL`: net weight in kg, 3 decimals.
    #[serde(rename = "pesoL", default, skip_serializing_if = "Option::is_none")]
    pub net_weight: Option<Numeric>,
    /// `pesoB`: gross weight in kg, 3 decimals.
    #[serde(rename = "pesoB", default, skip_serializing_if = "Option::is_none")]
    pub gross_weight: Option<Numeric>,
}

/// `pag` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "detPag", default)]
    pub details: Vec<PaymentDetail>,
    /// `vTroco`: change given.
    #[serde(rename = "vTroco", default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Numeric>,
}

/// `detPag` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetail {
    /// `indPag`: 0 cash, 1 installments.
    #[serde(rename = "indPag", default, skip_serializing_if = "Option::is_none")]
    pub indicator: Option<String>,
    /// `tPag`: payment method code.
    #[serde(rename = "tPag", default)]
    pub method: String,
    #[serde(rename = "vPag", default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

/// `card` group of a payment detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// `tpIntegra`: 1 integrated, 2 standalone terminal.
    #[serde(rename = "tpIntegra", default)]
    pub integration: String,
    /// `CNPJ` of the card processor.
    #[serde(rename = "CNPJ", default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    /// `tBand`: card brand.
    #[serde(rename = "tBand", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// `cAut`: authorization code.
    #[serde(rename = "cAut", default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
}

/// `infAdic` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(rename = "infAdFisco", default, skip_serializing_if = "Option::is_none")]
    pub fiscal: Option<String>,
    #[serde(rename = "infCpl", default, skip_serializing_if = "Option::is_none")]
    pub complementary: Option<String>,
}
