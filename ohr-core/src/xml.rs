//! Owned XML element tree
//!
//! Catalog codecs consume and produce [`Element`] values. Documents are read
//! with quick-xml's pull reader and written with its indenting writer; both
//! directions keep element order and attribute order intact.

use crate::error::XmlError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// Default limit on element nesting accepted by [`Element::parse`]
pub const DEFAULT_MAX_NESTING: usize = 512;

/// A single XML element with its attributes, text, and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Create an empty element with the given tag name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute, replacing any existing value with the same key
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child elements
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Concatenated text and CDATA content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First child element with the given tag name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Parse a document and return its root element
    pub fn parse(xml: &str) -> Result<Element, XmlError> {
        Self::parse_with_limit(xml, DEFAULT_MAX_NESTING)
    }

    /// Parse a document, refusing element nesting deeper than `max_nesting`
    pub fn parse_with_limit(xml: &str, max_nesting: usize) -> Result<Element, XmlError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = reader.buffer_position() as u64;
            let syntax = |message: String| XmlError::Syntax { position, message };

            match reader.read_event().map_err(|e| syntax(e.to_string()))? {
                Event::Start(start) => {
                    if stack.len() >= max_nesting {
                        return Err(XmlError::TooDeep { limit: max_nesting });
                    }
                    if stack.is_empty() && root.is_some() {
                        return Err(XmlError::MultipleRoots);
                    }
                    stack.push(element_from_start(&start).map_err(syntax)?);
                }
                Event::Empty(start) => {
                    if stack.len() >= max_nesting {
                        return Err(XmlError::TooDeep { limit: max_nesting });
                    }
                    let element = element_from_start(&start).map_err(syntax)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    // The reader checks that end tags match their start tags
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| syntax("unmatched end tag".to_string()))?;
                    // Indentation between child elements is not content
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let value = text.unescape().map_err(|e| syntax(e.to_string()))?;
                    match stack.last_mut() {
                        Some(current) => current.text.push_str(&value),
                        None if value.trim().is_empty() => {}
                        None => return Err(syntax("text outside of the root element".to_string())),
                    }
                }
                Event::CData(data) => {
                    let bytes = data.into_inner();
                    let value = std::str::from_utf8(&bytes).map_err(|e| syntax(e.to_string()))?;
                    match stack.last_mut() {
                        Some(current) => current.text.push_str(value),
                        None => return Err(syntax("CDATA outside of the root element".to_string())),
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and doctypes carry no data
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlError::Syntax {
                position: xml.len() as u64,
                message: format!("unclosed element <{}>", stack[stack.len() - 1].name),
            });
        }

        root.ok_or(XmlError::NoRoot)
    }

    /// Write this element as a complete document with two-space indentation
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, self)?;

        let result = writer.into_inner().into_inner();
        String::from_utf8(result).map_err(|e| XmlError::Write(e.to_string()))
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| e.to_string())?
        .to_string();

    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = std::str::from_utf8(attribute.key.as_ref()).map_err(|e| e.to_string())?;
        if element.attribute(key).is_some() {
            return Err(format!("duplicate attribute '{}'", key));
        }
        let value = attribute.unescape_value().map_err(|e| e.to_string())?;
        element
            .attributes
            .push((key.to_string(), value.into_owned()));
    }

    Ok(element)
}

/// Hand a finished element to its parent, or make it the document root
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_some() => Err(XmlError::MultipleRoots),
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_empty() && element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if !element.text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&element.text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
