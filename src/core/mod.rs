//! Building blocks shared by NF-e and CT-e: digit handling, the modulus-11
//! access key, the XML writer, errors and configuration.

mod access_key;
mod check_digit;
mod config;
mod digits;
mod emitter;
mod error;
mod timestamp;
mod types;
pub mod validation;
mod value;
pub mod xml;

pub use access_key::*;
pub use check_digit::*;
pub use config::*;
pub use digits::*;
pub use emitter::*;
pub use error::*;
pub use timestamp::*;
pub use types::*;
pub use value::*;
pub use xml::{XmlResult, XmlWriter, escape_xml};
