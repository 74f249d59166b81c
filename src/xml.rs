//! Thin pretty-printing layer over `quick_xml::Writer`.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};

pub(crate) fn xml_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Xml(e.to_string())
}

/// An in-memory XML document written with two-space indentation.
pub(crate) struct XmlDocument {
    writer: Writer<Vec<u8>>,
}

impl XmlDocument {
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;
        Ok(Self { writer })
    }

    pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(tag);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.writer
            .write_event(Event::Start(start))
            .map_err(xml_err)
    }

    pub fn close(&mut self, tag: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(tag)))
            .map_err(xml_err)
    }

    /// `<tag attrs>text</tag>` on one line.
    pub fn leaf(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.open(tag, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)?;
        self.close(tag)
    }

    /// `<tag/>`.
    pub fn empty(&mut self, tag: &str) -> Result<()> {
        self.writer
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(xml_err)
    }

    pub fn finish(self) -> Result<String> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(xml_err)
    }
}
