//! NF-e (Nota Fiscal Eletrônica, modelo 55) validation and layout 4.00 XML.
//!
//! ```no_run
//! use dfe::nfe::{NfePayload, emit_nfe};
//!
//! let payload: NfePayload = serde_json::from_str(&std::fs::read_to_string("nfe.json")?)?;
//! let auth = emit_nfe(&payload)?;
//! println!("{} {}", auth.nfe_key, auth.xml.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod emit;
mod totals;
mod types;
mod validate;
mod xml;

pub use emit::*;
pub use totals::*;
pub use types::*;
pub use validate::*;
pub use xml::*;

/// Namespace of the `NFe` root element.
pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";
