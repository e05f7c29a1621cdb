//! Owned XML tree for project files
//!
//! The tree is built from `quick-xml` events and keeps every event it does not
//! understand (declaration, doctype, comments, processing instructions,
//! whitespace) so that writing it back only changes what was edited. Start
//! tags are kept raw; an element is re-encoded only when one of its
//! attributes is set.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

const BOM: char = '\u{feff}';

/// Failure to read or write the XML tree
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("{0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("closing tag </{0}> has no matching start tag")]
    UnexpectedEnd(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("failed to serialize document: {0}")]
    Write(String),
}

/// A node of the tree
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(BytesText<'static>),
    CData(BytesCData<'static>),
    /// Declaration, doctype, comment or processing instruction, kept verbatim
    Other(Event<'static>),
}

/// An element with its raw start tag and children
#[derive(Debug, Clone)]
pub struct Element {
    start: BytesStart<'static>,
    children: Vec<Node>,
    /// Written as `<name/>` while it has no children
    empty: bool,
}

/// A parsed project document
#[derive(Debug, Clone)]
pub struct XmlDocument {
    /// Declaration, doctype, comments and whitespace before the root
    prolog: Vec<Node>,
    root: Element,
    /// Whatever follows the root element
    epilog: Vec<Node>,
    bom: bool,
}

impl XmlDocument {
    /// Parse a whole document
    ///
    /// Attribute values and text are checked while parsing, so accessors on
    /// the resulting tree never fail.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let (bom, xml) = match xml.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, xml),
        };

        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();

        loop {
            let node = match reader.read_event()? {
                Event::Start(e) => {
                    validate_attributes(&e)?;
                    stack.push(Element::new(e.into_owned(), false));
                    continue;
                }
                Event::End(e) => {
                    let Some(element) = stack.pop() else {
                        return Err(XmlError::UnexpectedEnd(
                            String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        ));
                    };
                    Node::Element(element)
                }
                Event::Empty(e) => {
                    validate_attributes(&e)?;
                    Node::Element(Element::new(e.into_owned(), true))
                }
                Event::Text(t) => {
                    t.unescape()?;
                    Node::Text(t.into_owned())
                }
                Event::CData(c) => Node::CData(c.into_owned()),
                Event::Eof => break,
                other => Node::Other(other.into_owned()),
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => nodes.push(node),
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name()));
        }

        let mut prolog = Vec::new();
        let mut root = None;
        let mut epilog = Vec::new();
        for node in nodes {
            match node {
                Node::Element(element) if root.is_none() => root = Some(element),
                Node::Element(_) => return Err(XmlError::MultipleRoots),
                other if root.is_none() => prolog.push(other),
                other => epilog.push(other),
            }
        }
        let root = root.ok_or(XmlError::NoRoot)?;

        Ok(Self {
            prolog,
            root,
            epilog,
            bom,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Serialize the whole document
    pub fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        let mut buffer = Vec::new();
        if self.bom {
            let mut encoded = [0u8; 3];
            buffer.extend_from_slice(BOM.encode_utf8(&mut encoded).as_bytes());
        }

        let mut writer = Writer::new(buffer);
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        self.root.write(&mut writer)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }
        Ok(writer.into_inner())
    }
}

impl Element {
    fn new(start: BytesStart<'static>, empty: bool) -> Self {
        Self {
            start,
            children: Vec::new(),
            empty,
        }
    }

    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    pub fn is(&self, name: &str) -> bool {
        self.start.name().as_ref() == name.as_bytes()
    }

    /// Unescaped value of attribute `key`
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.start
            .attributes()
            .with_checks(false)
            .flatten()
            .find(|attr| attr.key.as_ref() == key.as_bytes())
            .and_then(|attr| attr.unescape_value().ok().map(Cow::into_owned))
    }

    /// Set attribute `key`, keeping the other attributes in order
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        let mut updated = BytesStart::new(self.name());
        let mut replaced = false;

        for attr in self.start.attributes().with_checks(false).flatten() {
            if attr.key.as_ref() == key.as_bytes() {
                updated.push_attribute((key, value));
                replaced = true;
            } else if attr.value.contains(&b'"') {
                // single-quoted originally, re-escape for double quotes
                let other_key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let other_value = attr
                    .unescape_value()
                    .map(Cow::into_owned)
                    .unwrap_or_default();
                updated.push_attribute((other_key.as_str(), other_value.as_str()));
            } else {
                updated.push_attribute(attr);
            }
        }
        if !replaced {
            updated.push_attribute((key, value));
        }

        self.start = updated;
    }

    /// Direct child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First direct child named `name`
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.is(name))
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.is(name) => Some(element),
            _ => None,
        })
    }

    /// Concatenated text content of the direct text children
    ///
    /// `None` when the element holds no text at all.
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) => {
                    if let Ok(unescaped) = t.unescape() {
                        text.push_str(&unescaped);
                    }
                }
                Node::CData(c) => text.push_str(&String::from_utf8_lossy(c)),
                _ => {}
            }
        }
        (!text.is_empty()).then_some(text)
    }

    /// Replace the text content, leaving child elements in place
    pub fn set_text(&mut self, value: &str) {
        self.children
            .retain(|node| !matches!(node, Node::Text(_) | Node::CData(_)));
        self.children
            .insert(0, Node::Text(BytesText::new(value).into_owned()));
        self.empty = false;
    }

    /// Index paths of the elements matching `.//first/second/...`
    ///
    /// `first` is searched among all descendants, each further step among the
    /// direct children of the previous matches. Index paths are relative to
    /// `self` and stay valid as long as no node is inserted or removed.
    pub fn select(&self, path: &[&str]) -> Vec<Vec<usize>> {
        let Some((first, rest)) = path.split_first() else {
            return Vec::new();
        };

        let mut current = Vec::new();
        self.collect_descendants(first, &mut Vec::new(), &mut current);

        for step in rest {
            let mut next = Vec::new();
            for index in &current {
                let Some(element) = self.at(index) else {
                    continue;
                };
                for (i, node) in element.children.iter().enumerate() {
                    if let Node::Element(child) = node {
                        if child.is(step) {
                            let mut child_index = index.clone();
                            child_index.push(i);
                            next.push(child_index);
                        }
                    }
                }
            }
            current = next;
        }

        current
    }

    fn collect_descendants(&self, name: &str, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        for (i, node) in self.children.iter().enumerate() {
            if let Node::Element(child) = node {
                prefix.push(i);
                if child.is(name) {
                    out.push(prefix.clone());
                }
                child.collect_descendants(name, prefix, out);
                prefix.pop();
            }
        }
    }

    /// Element at an index path returned by [`Element::select`]
    pub fn at(&self, index: &[usize]) -> Option<&Element> {
        index
            .iter()
            .try_fold(self, |element, &i| match element.children.get(i) {
                Some(Node::Element(child)) => Some(child),
                _ => None,
            })
    }

    pub fn at_mut(&mut self, index: &[usize]) -> Option<&mut Element> {
        let mut element = self;
        for &i in index {
            element = match element.children.get_mut(i) {
                Some(Node::Element(child)) => child,
                _ => return None,
            };
        }
        Some(element)
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), XmlError> {
        if self.empty && self.children.is_empty() {
            return emit(writer, Event::Empty(self.start.borrow()));
        }

        emit(writer, Event::Start(self.start.borrow()))?;
        for node in &self.children {
            write_node(writer, node)?;
        }
        emit(writer, Event::End(BytesEnd::new(self.name())))
    }
}

fn validate_attributes(start: &BytesStart<'_>) -> Result<(), XmlError> {
    for attr in start.attributes() {
        attr?.unescape_value()?;
    }
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), XmlError> {
    match node {
        Node::Element(element) => element.write(writer),
        Node::Text(text) => emit(writer, Event::Text(text.clone())),
        Node::CData(cdata) => emit(writer, Event::CData(cdata.clone())),
        Node::Other(event) => emit(writer, event.clone()),
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}
