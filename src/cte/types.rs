use serde::{Deserialize, Serialize};

use crate::core::{Address, FieldMap, Numeric, string_or_number};

use super::modal::ModalInfo;
use super::payer::Tomador;

/// A CT-e (modelo 57) as submitted for emission.
///
/// Mandatory sections are `Option` so that the validator can report a
/// missing one by its wire path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CtePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ide: Option<CteIde>,
    /// `compl`: free-text observations.
    #[serde(rename = "compl", skip_serializing_if = "Option::is_none")]
    pub complement: Option<Complement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit: Option<CteIssuer>,
    /// `rem`: sender (remetente).
    #[serde(rename = "rem", skip_serializing_if = "Option::is_none")]
    pub sender: Option<CteSender>,
    /// `dest`: recipient (destinatário).
    #[serde(rename = "dest", skip_serializing_if = "Option::is_none")]
    pub recipient: Option<CteRecipient>,
    /// `toma`: who pays for the service.
    #[serde(rename = "toma", skip_serializing_if = "Option::is_none")]
    pub payer: Option<Tomador>,
    /// `vPrest`: service value.
    #[serde(rename = "vPrest", skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceValue>,
    /// `imp`: taxes.
    #[serde(rename = "imp", skip_serializing_if = "Option::is_none")]
    pub taxes: Option<CteTaxes>,
    /// `infCarga`: cargo.
    #[serde(rename = "infCarga", skip_serializing_if = "Option::is_none")]
    pub cargo: Option<CargoInfo>,
    /// `infModal`: transport-mode block.
    #[serde(rename = "infModal", skip_serializing_if = "Option::is_none")]
    pub modal: Option<ModalInfo>,
    /// `autXML`: parties allowed to download the XML.
    #[serde(rename = "autXML", default, skip_serializing_if = "Vec::is_empty")]
    pub authorized_viewers: Vec<AuthorizedViewer>,
    #[serde(rename = "prot", skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
}

/// `ide` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CteIde {
    #[serde(rename = "cUF", default)]
    pub state_code: String,
    /// `cCT`: numeric code; generated when absent.
    #[serde(rename = "cCT", default, skip_serializing_if = "Option::is_none")]
    pub numeric_code: Option<String>,
    #[serde(rename = "CFOP", default)]
    pub cfop: String,
    #[serde(rename = "natOp", default)]
    pub operation_nature: String,
    /// `mod`: document model (57).
    #[serde(rename = "mod", default)]
    pub model: String,
    #[serde(rename = "serie", default, deserialize_with = "string_or_number")]
    pub series: String,
    #[serde(rename = "nCT", default, deserialize_with = "string_or_number")]
    pub number: String,
    #[serde(rename = "dhEmi", default)]
    pub emitted_at: String,
    /// `tpImp`: DACTE print format.
    #[serde(rename = "tpImp", default)]
    pub print_format: String,
    #[serde(rename = "tpEmis", default)]
    pub emission_type: String,
    #[serde(rename = "tpAmb", default)]
    pub environment: String,
    /// `tpCTe`: normal, complementary, cancellation or substitute.
    #[serde(rename = "tpCTe", default)]
    pub cte_type: String,
    #[serde(rename = "procEmi", default)]
    pub process: String,
    #[serde(rename = "verProc", default)]
    pub process_version: String,
    /// `cMunEnv`: municipality where the CT-e is sent from.
    #[serde(rename = "cMunEnv", default)]
    pub sending_municipality_code: String,
    #[serde(rename = "xMunEnv", default)]
    pub sending_municipality: String,
    #[serde(rename = "UFEnv", default)]
    pub sending_state: String,
    /// `modal`: two-digit transport mode code, see [`ModalCode`](super::ModalCode).
    #[serde(rename = "modal", default)]
    pub modal: String,
    /// `tpServ`: service type.
    #[serde(rename = "tpServ", default)]
    pub service_type: String,
    /// `indIEToma`: payer state registration indicator.
    #[serde(rename = "indIEToma", default)]
    pub payer_registration_indicator: String,
}

/// `compl` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Complement {
    /// `xObs`: general observations.
    #[serde(rename = "xObs", default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(rename = "ObsCont", default, skip_serializing_if = "Vec::is_empty")]
    pub taxpayer_notes: Vec<TaxpayerNote>,
}

/// `ObsCont` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxpayerNote {
    #[serde(rename = "xCampo", default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "xTexto", default)]
    pub text: String,
}

/// `emit` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CteIssuer {
    #[serde(rename = "CNPJ", default)]
    pub cnpj: String,
    #[serde(rename = "IE", default)]
    pub state_registration: String,
    #[serde(rename = "xNome", default)]
    pub name: String,
    #[serde(rename = "xFant", default, skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
    #[serde(rename = "enderEmit", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Identification shared by the sender, recipient and other-payer blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CteParty {
    #[serde(rename = "CNPJ", default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(rename = "CPF", default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "IE", default, skip_serializing_if = "Option::is_none")]
    pub state_registration: Option<String>,
    #[serde(rename = "xNome", default)]
    pub name: String,
    #[serde(rename = "fone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// `rem` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CteSender {
    #[serde(flatten)]
    pub party: CteParty,
    #[serde(rename = "enderReme", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// `dest` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CteRecipient {
    #[serde(flatten)]
    pub party: CteParty,
    #[serde(rename = "enderDest", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// `vPrest` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceValue {
    /// `vTPrest`: total service value.
    #[serde(rename = "vTPrest", default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Numeric>,
    /// `vRec`: amount to receive.
    #[serde(rename = "vRec", default, skip_serializing_if = "Option::is_none")]
    pub receivable: Option<Numeric>,
    #[serde(rename = "component", default)]
    pub components: Vec<ServiceComponent>,
}

/// Itemized part of the service value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceComponent {
    #[serde(rename = "xNome", default)]
    pub name: String,
    #[serde(rename = "vComp", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Numeric>,
}

/// `imp` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CteTaxes {
    /// `ICMS`: open-ended group (`ICMS00`, `ICMS45`, ...).
    #[serde(rename = "ICMS", default, skip_serializing_if = "Option::is_none")]
    pub icms: Option<FieldMap>,
    #[serde(rename = "infAdFisco", default, skip_serializing_if = "Option::is_none")]
    pub fiscal_info: Option<String>,
}

/// `infCarga` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoInfo {
    /// `vCarga`: declared cargo value.
    #[serde(rename = "vCarga", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Numeric>,
    /// `proPred`: predominant product.
    #[serde(rename = "proPred", default)]
    pub predominant_product: String,
    /// `xOutCat`: other cargo characteristics.
    #[serde(rename = "xOutCat", default, skip_serializing_if = "Option::is_none")]
    pub other_characteristics: Option<String>,
    #[serde(rename = "infQ", default)]
    pub quantities: Vec<CargoQuantity>,
}

/// `infQ` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoQuantity {
    /// `cUnid`: unit code (00 m3, 01 kg, 02 ton, ...).
    #[serde(rename = "cUnid", default)]
    pub unit: String,
    /// `tpMed`: kind of measure.
    #[serde(rename = "tpMed", default)]
    pub measure: String,
    /// `qCarga`: 3 decimals.
    #[serde(rename = "qCarga", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Numeric>,
}

/// `autXML` entry: exactly one of CNPJ or CPF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedViewer {
    #[serde(rename = "CNPJ", default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(rename = "CPF", default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
}

/// `prot` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    #[serde(rename = "infRespTec", default, skip_serializing_if = "Option::is_none")]
    pub technical_responsible: Option<TechnicalResponsible>,
}

/// `infRespTec`: the software house responsible for the emitting system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalResponsible {
    #[serde(rename = "CNPJ", default)]
    pub cnpj: String,
    #[serde(rename = "xContato", default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "fone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
