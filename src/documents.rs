//! Generic XML document tree
//!
//! Turns raw markup into the namespace-resolved, order-preserving tree the
//! validator walks. Namespace declarations are consumed while building and
//! never show up as ordinary attributes; text runs are trimmed and
//! concatenated per element.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::{NamespaceContext, QName};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element qualified name, namespace already resolved
    pub qname: QName,
    /// Attributes in document order; prefixed ones keyed as `{uri}local`
    pub attributes: IndexMap<String, String>,
    /// Trimmed, concatenated text content (empty if none)
    pub text: String,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: IndexMap::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the resolved namespace of the element, empty if none
    pub fn namespace(&self) -> &str {
        self.qname.namespace_or_empty()
    }

    /// Get an attribute value by its key
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append a text run, trimming it first
    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text.trim());
    }
}

/// XML Document representation
#[derive(Debug, Clone)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
}

impl Document {
    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes with default limits
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut root: Option<Element> = None;
        let mut stack: Vec<(Element, NamespaceContext)> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    limits.check_xml_depth(stack.len() + 1)?;
                    let parent_ns = stack.last().map(|(_, ns)| ns);
                    let (element, scope) = Self::parse_element(&e, parent_ns, limits)?;
                    if stack.is_empty() && root.is_some() {
                        return Err(Error::XmlParse(
                            "document has more than one root element".to_string(),
                        ));
                    }
                    stack.push((element, scope));
                }
                Ok(Event::End(_)) => {
                    if let Some((current, _)) = stack.pop() {
                        match stack.last_mut() {
                            Some((parent, _)) => parent.add_child(current),
                            None => root = Some(current),
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    limits.check_xml_depth(stack.len() + 1)?;
                    let parent_ns = stack.last().map(|(_, ns)| ns);
                    let (element, _) = Self::parse_element(&e, parent_ns, limits)?;
                    match stack.last_mut() {
                        Some((parent, _)) => parent.add_child(element),
                        None if root.is_some() => {
                            return Err(Error::XmlParse(
                                "document has more than one root element".to_string(),
                            ))
                        }
                        None => root = Some(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some((current, _)) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::XmlParse(format!("Failed to unescape text: {}", e)))?;
                        current.push_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some((current, _)) = stack.last_mut() {
                        let raw = e.into_inner();
                        let text = std::str::from_utf8(&raw)
                            .map_err(|e| Error::XmlParse(format!("Invalid CDATA: {}", e)))?;
                        current.push_text(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlParse(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Ignore other events (comments, processing instructions, etc.)
            }
            buf.clear();
        }

        if let Some((open, _)) = stack.last() {
            return Err(Error::XmlParse(format!(
                "unexpected end of document inside element '{}'",
                open.local_name()
            )));
        }

        root.map(|root| Document { root })
            .ok_or_else(|| Error::XmlParse("document has no root element".to_string()))
    }

    /// Parse element from a start tag, returning it with its namespace scope
    fn parse_element(
        start: &BytesStart,
        parent_ns: Option<&NamespaceContext>,
        limits: &Limits,
    ) -> Result<(Element, NamespaceContext)> {
        let mut scope = parent_ns.cloned().unwrap_or_default();
        let mut regular = Vec::new();

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::XmlParse(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::XmlParse(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::XmlParse(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            // Namespace declarations apply to the element itself and its attributes
            if attr_name == "xmlns" {
                scope.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                scope.add_prefix(prefix, attr_value);
            } else {
                regular.push((attr_name, attr_value));
            }
        }
        limits.check_attributes(regular.len())?;

        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| Error::XmlParse(format!("Invalid element name: {}", e)))?;

        let mut element = Element::new(scope.resolve_element(name));
        for (attr_name, attr_value) in regular {
            element.set_attribute(scope.attribute_key(&attr_name), attr_value);
        }

        Ok((element, scope))
    }
}
