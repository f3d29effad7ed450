//! CT-e (Conhecimento de Transporte Eletrônico, modelo 57) validation and
//! layout 4.00 XML.
//!
//! Two fields steer the document shape: `ide.modal` selects exactly one
//! block of `infModal` ([`ModalBlock`]), and `toma.toma` selects the payer
//! ([`PayerRole`]), with `toma3` carried only for role 4.

mod emit;
mod modal;
mod payer;
mod types;
mod validate;
mod xml;

pub use emit::*;
pub use modal::*;
pub use payer::*;
pub use types::*;
pub use validate::*;
pub use xml::*;

/// Namespace of the `CTe` root element.
pub const CTE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/cte";
