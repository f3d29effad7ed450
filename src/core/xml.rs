//! Compact XML writer and the generic value serializer.
//!
//! Output is unindented: the SEFAZ layouts are whitespace-sensitive once
//! signed, so nothing is emitted between elements.

use std::borrow::Cow;
use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::digits::format_decimal;
use super::error::DfeError;
use super::types::{Address, Numeric};
use super::value::{ATTRIBUTES_KEY, FieldMap, FieldValue, TEXT_KEY};

/// Result of a whole-document encoder.
pub type XmlResult = Result<String, DfeError>;

fn xml_io(e: std::io::Error) -> DfeError {
    DfeError::Xml(format!("XML write error: {e}"))
}

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_xml(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    /// A writer positioned after `<?xml version="1.0" encoding="UTF-8"?>`.
    pub fn new() -> Result<Self, DfeError> {
        let mut writer = Self::fragment();
        writer
            .writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(writer)
    }

    /// A writer without XML declaration, for standalone fragments.
    pub fn fragment() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    pub fn into_string(self) -> Result<String, DfeError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| DfeError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, DfeError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, DfeError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer.write_event(Event::Start(elem)).map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, DfeError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> Result<&mut Self, DfeError> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        Ok(self)
    }

    /// `<name>text</name>`, or nothing at all when `text` is empty.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, DfeError> {
        if text.is_empty() {
            return Ok(self);
        }
        self.start_element(name)?;
        self.text(text)?;
        self.end_element(name)
    }

    /// Like [`text_element`](Self::text_element); nothing when `None`.
    pub fn opt_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, DfeError> {
        match text {
            Some(t) => self.text_element(name, t),
            None => Ok(self),
        }
    }

    /// A number rendered with exactly `decimals` fractional digits.
    pub fn numeric_element(
        &mut self,
        name: &str,
        value: &Numeric,
        decimals: u32,
    ) -> Result<&mut Self, DfeError> {
        let formatted = format_decimal(value, decimals)
            .map_err(|e| DfeError::Format(format!("{name}: {e}")))?;
        self.text_element(name, &formatted)
    }

    pub fn opt_numeric_element(
        &mut self,
        name: &str,
        value: Option<&Numeric>,
        decimals: u32,
    ) -> Result<&mut Self, DfeError> {
        match value {
            Some(v) => self.numeric_element(name, v, decimals),
            None => Ok(self),
        }
    }

    /// Serialize an open-ended value under `name`.
    ///
    /// Lists repeat `name` once per entry, nulls are dropped, and a mapping
    /// honors the reserved [`ATTRIBUTES_KEY`] and [`TEXT_KEY`] entries.
    pub fn value_element(&mut self, name: &str, value: &FieldValue) -> Result<&mut Self, DfeError> {
        match value {
            FieldValue::Null => Ok(self),
            FieldValue::List(items) => {
                for item in items {
                    self.value_element(name, item)?;
                }
                Ok(self)
            }
            FieldValue::Map(map) => self.map_element(name, map),
            FieldValue::Bool(_)
            | FieldValue::Integer(_)
            | FieldValue::Float(_)
            | FieldValue::Text(_) => {
                let text = value.scalar_text().unwrap_or_default();
                self.start_element(name)?;
                self.text(&text)?;
                self.end_element(name)
            }
        }
    }

    /// Serialize every non-reserved entry of `map` as a child element, in
    /// the map's own order.
    pub fn map_children(&mut self, map: &FieldMap) -> Result<&mut Self, DfeError> {
        for (key, value) in map.iter() {
            if key == ATTRIBUTES_KEY || key == TEXT_KEY {
                continue;
            }
            self.value_element(key, value)?;
        }
        Ok(self)
    }

    /// Address block (`enderEmit`, `enderDest`, ...) in layout order.
    pub fn address_element(&mut self, name: &str, address: &Address) -> Result<&mut Self, DfeError> {
        self.start_element(name)?;
        self.text_element("xLgr", &address.street)?;
        self.text_element("nro", &address.number)?;
        self.opt_text_element("xCpl", address.complement.as_deref())?;
        self.text_element("xBairro", &address.district)?;
        self.text_element("cMun", &address.municipality_code)?;
        self.text_element("xMun", &address.municipality)?;
        self.text_element("UF", &address.state)?;
        self.opt_text_element("CEP", address.postal_code.as_deref())?;
        self.text_element("cPais", &address.country_code)?;
        self.text_element("xPais", &address.country)?;
        self.opt_text_element("fone", address.phone.as_deref())?;
        self.end_element(name)
    }

    /// `<name>` wrapping the children of `map`.
    ///
    /// [`ATTRIBUTES_KEY`] becomes attributes of `<name>`; a scalar
    /// [`TEXT_KEY`] replaces the children with text content.
    pub fn map_element(&mut self, name: &str, map: &FieldMap) -> Result<&mut Self, DfeError> {
        let attrs: Vec<(&str, String)> = match map.get(ATTRIBUTES_KEY) {
            Some(FieldValue::Map(attrs)) => attrs
                .iter()
                .filter_map(|(k, v)| v.scalar_text().map(|t| (k, t)))
                .collect(),
            _ => Vec::new(),
        };
        let attr_refs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.start_element_with_attrs(name, &attr_refs)?;
        match map.get(TEXT_KEY).and_then(FieldValue::scalar_text) {
            Some(text) => {
                self.text(&text)?;
            }
            None => {
                self.map_children(map)?;
            }
        }
        self.end_element(name)
    }
}
