//! Transport-mode block (`infModal`) and its selection by `ide.modal`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{FieldMap, ValidationError};

/// Transport mode declared in `ide.modal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalCode {
    /// 01
    Road,
    /// 02
    Air,
    /// 03
    Waterway,
    /// 04
    Rail,
    /// 05
    Pipeline,
    /// 06 to 09
    Multimodal,
}

impl ModalCode {
    /// Parse a two-digit modal code.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "01" => Some(Self::Road),
            "02" => Some(Self::Air),
            "03" => Some(Self::Waterway),
            "04" => Some(Self::Rail),
            "05" => Some(Self::Pipeline),
            "06" | "07" | "08" | "09" => Some(Self::Multimodal),
            _ => None,
        }
    }

    /// `infModal` key that carries this mode's block.
    pub fn slot(self) -> &'static str {
        match self {
            Self::Road => "rodo",
            Self::Air => "aereo",
            Self::Waterway => "aquav",
            Self::Rail => "ferro",
            Self::Pipeline => "duto",
            Self::Multimodal => "multimodal",
        }
    }
}

impl fmt::Display for ModalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slot())
    }
}

/// `infModal`: one optional slot per transport mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalInfo {
    /// `versaoModal`: layout version of the mode block.
    #[serde(rename = "versaoModal", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "rodo", default, skip_serializing_if = "Option::is_none")]
    pub road: Option<RoadModal>,
    #[serde(rename = "aereo", default, skip_serializing_if = "Option::is_none")]
    pub air: Option<FieldMap>,
    #[serde(rename = "aquav", default, skip_serializing_if = "Option::is_none")]
    pub waterway: Option<FieldMap>,
    #[serde(rename = "ferro", default, skip_serializing_if = "Option::is_none")]
    pub rail: Option<FieldMap>,
    #[serde(rename = "duto", default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<FieldMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multimodal: Option<FieldMap>,
}

/// `rodo`: only the carrier registry number is rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadModal {
    /// `RNTRC`: national road cargo carrier registry.
    #[serde(rename = "RNTRC", default)]
    pub rntrc: String,
}

/// The mode block selected by a [`ModalCode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModalBlock<'a> {
    Road(&'a RoadModal),
    Air(&'a FieldMap),
    Waterway(&'a FieldMap),
    Rail(&'a FieldMap),
    Pipeline(&'a FieldMap),
    Multimodal(&'a FieldMap),
}

impl ModalBlock<'_> {
    /// Element name of the block.
    pub fn tag(&self) -> &'static str {
        self.code().slot()
    }

    pub fn code(&self) -> ModalCode {
        match self {
            Self::Road(_) => ModalCode::Road,
            Self::Air(_) => ModalCode::Air,
            Self::Waterway(_) => ModalCode::Waterway,
            Self::Rail(_) => ModalCode::Rail,
            Self::Pipeline(_) => ModalCode::Pipeline,
            Self::Multimodal(_) => ModalCode::Multimodal,
        }
    }
}

impl ModalInfo {
    /// Slots that carry a block, in layout order.
    pub fn present_slots(&self) -> Vec<&'static str> {
        [
            ("rodo", self.road.is_some()),
            ("aereo", self.air.is_some()),
            ("aquav", self.waterway.is_some()),
            ("ferro", self.rail.is_some()),
            ("duto", self.pipeline.is_some()),
            ("multimodal", self.multimodal.is_some()),
        ]
        .into_iter()
        .filter_map(|(slot, present)| present.then_some(slot))
        .collect()
    }

    /// Pick the block for `code`.
    ///
    /// Fails unless exactly one slot is filled and it is the one `code`
    /// selects. A road block needs `RNTRC`; any other block must not be
    /// empty.
    pub fn select(&self, code: ModalCode) -> Result<ModalBlock<'_>, ValidationError> {
        let present = self.present_slots();
        if present.is_empty() {
            return Err(required(code));
        }
        if present.len() > 1 {
            return Err(ValidationError::new(
                "infModal",
                format!(
                    "must contain only the block of the declared modal, found {}",
                    present.join(", ")
                ),
            ));
        }

        match code {
            ModalCode::Road => {
                let road = self.road.as_ref().ok_or_else(|| required(code))?;
                if road.rntrc.trim().is_empty() {
                    return Err(ValidationError::missing("infModal.rodo.RNTRC"));
                }
                Ok(ModalBlock::Road(road))
            }
            ModalCode::Air => non_empty(self.air.as_ref(), code).map(ModalBlock::Air),
            ModalCode::Waterway => non_empty(self.waterway.as_ref(), code).map(ModalBlock::Waterway),
            ModalCode::Rail => non_empty(self.rail.as_ref(), code).map(ModalBlock::Rail),
            ModalCode::Pipeline => non_empty(self.pipeline.as_ref(), code).map(ModalBlock::Pipeline),
            ModalCode::Multimodal => {
                non_empty(self.multimodal.as_ref(), code).map(ModalBlock::Multimodal)
            }
        }
    }
}

fn required(code: ModalCode) -> ValidationError {
    ValidationError::new(
        format!("infModal.{}", code.slot()),
        format!("is required for modal {code}"),
    )
}

fn non_empty(block: Option<&FieldMap>, code: ModalCode) -> Result<&FieldMap, ValidationError> {
    let block = block.ok_or_else(|| required(code))?;
    if block.is_empty() {
        return Err(ValidationError::new(
            format!("infModal.{}", code.slot()),
            "must not be empty",
        ));
    }
    Ok(block)
}
