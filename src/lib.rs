//! # dfe
//!
//! Brazilian electronic fiscal documents: NF-e (modelo 55) and CT-e
//! (modelo 57). Payloads arrive as JSON, are checked against the business
//! rules of each document, keyed with a 44-digit access key and encoded as
//! layout 4.00 XML.
//!
//! Amounts are parsed into [`rust_decimal::Decimal`] and rounded half away
//! from zero; floating point never reaches the XML.
//!
//! ## Quick Start
//!
//! ```rust
//! use dfe::{Emitter, FixedCode};
//! use dfe::nfe::NfePayload;
//!
//! let payload: NfePayload = serde_json::from_str(r#"{
//!     "ide": {"cUF": "35", "natOp": "VENDA", "mod": "55", "serie": 1, "nNF": 1,
//!             "dhEmi": "2025-07-10T10:00:00-03:00", "tpNF": "1", "idDest": "1",
//!             "cMunFG": "3550308", "tpImp": "1", "tpEmis": "1", "tpAmb": "2",
//!             "finNFe": "1", "indFinal": "1", "indPres": "1", "procEmi": "0",
//!             "verProc": "1.0"},
//!     "emit": {"CNPJ": "12345678000195", "xNome": "Loja", "IE": "123456789", "CRT": "1",
//!              "enderEmit": {"xLgr": "Rua A", "nro": "1", "xBairro": "Centro",
//!                            "cMun": "3550308", "xMun": "Sao Paulo", "UF": "SP",
//!                            "CEP": "01001000", "cPais": "1058", "xPais": "Brasil"}},
//!     "dest": {"CPF": "12345678909", "xNome": "Cliente", "indIEDest": "9",
//!              "enderDest": {"xLgr": "Rua B", "nro": "2", "xBairro": "Centro",
//!                            "cMun": "3550308", "xMun": "Sao Paulo", "UF": "SP",
//!                            "CEP": "01001000", "cPais": "1058", "xPais": "Brasil"}},
//!     "items": [{"prod": {"cProd": "1", "xProd": "Caneta", "NCM": "96081000",
//!                         "CFOP": "5102", "uCom": "UN", "qCom": 1, "vUnCom": 100,
//!                         "vProd": 100, "uTrib": "UN", "qTrib": 1, "vUnTrib": 100,
//!                         "indTot": "1"}}],
//!     "transp": {"modFrete": "9"},
//!     "pag": {"detPag": [{"tPag": "01", "vPag": 100}]}
//! }"#).unwrap();
//!
//! let emitter = Emitter::default().with_code_source(FixedCode(12345678));
//! let auth = emitter.emit_nfe(&payload).unwrap();
//!
//! assert_eq!(auth.nfe_key.len(), 44);
//! assert!(auth.xml.contains("<vNF>100.00</vNF>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Access key, check digit, numeric formatting, XML writer, emitter |
//! | `nfe` (default) | NF-e payload, validation, totals and XML |
//! | `cte` (default) | CT-e payload, validation, payer/modal selection and XML |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "nfe")]
pub mod nfe;

#[cfg(feature = "cte")]
pub mod cte;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
