//! Owned XML element tree for the parts that get edited.
//!
//! Parsing keeps every event it does not model (declaration, text, comments,
//! processing instructions) verbatim, so writing an untouched tree back gives
//! an equivalent document.

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

use crate::errors::{NarratorError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Other(Event<'static>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `p:cTn`.
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Other(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Other(_) => None,
        })
    }

    /// First direct child with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.local_name() == local)
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.local_name() == local)
    }

    /// Position of the first direct child with the given local name, counted
    /// over all nodes.
    pub fn child_position(&self, local: &str) -> Option<usize> {
        self.children.iter().position(|node| {
            matches!(node, XmlNode::Element(element) if element.local_name() == local)
        })
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn insert(&mut self, index: usize, child: XmlElement) {
        self.children.insert(index, XmlNode::Element(child));
    }

    /// Depth-first search over descendants, not including `self`.
    pub fn find(&self, predicate: &dyn Fn(&XmlElement) -> bool) -> Option<&XmlElement> {
        for element in self.elements() {
            if predicate(element) {
                return Some(element);
            }
            if let Some(found) = element.find(predicate) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_mut(
        &mut self,
        predicate: &dyn Fn(&XmlElement) -> bool,
    ) -> Option<&mut XmlElement> {
        for element in self.elements_mut() {
            if predicate(element) {
                return Some(element);
            }
            if let Some(found) = element.find_mut(predicate) {
                return Some(found);
            }
        }
        None
    }

    /// First descendant with the given local name.
    pub fn descendant(&self, local: &str) -> Option<&XmlElement> {
        self.find(&|e| e.local_name() == local)
    }

    pub fn descendant_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.find_mut(&|e| e.local_name() == local)
    }

    /// Unescaped text of the direct text and CDATA children.
    pub fn text(&self) -> Result<String> {
        let mut text = String::new();
        for node in &self.children {
            match node {
                XmlNode::Other(Event::Text(t)) => text.push_str(&t.unescape()?),
                XmlNode::Other(Event::CData(c)) => text.push_str(&String::from_utf8_lossy(c)),
                _ => {}
            }
        }
        Ok(text)
    }

    /// Visit every descendant element, including `self`.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a XmlElement)) {
        visit(self);
        for element in self.elements() {
            element.walk(visit);
        }
    }

    fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute(Attribute {
                key: QName(key.as_bytes()),
                value: Cow::Owned(escape_attribute(value).into_bytes()),
            });
        }

        if self.children.is_empty() {
            write_event(writer, Event::Empty(start))?;
            return Ok(());
        }

        write_event(writer, Event::Start(start))?;
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.write_to(writer)?,
                XmlNode::Other(event) => write_event(writer, event.clone())?,
            }
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

/// A parsed XML part: prolog and epilog events around a single root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    prolog: Vec<Event<'static>>,
    pub root: XmlElement,
    epilog: Vec<Event<'static>>,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self {
            prolog: vec![Event::Decl(quick_xml::events::BytesDecl::new(
                "1.0",
                Some("UTF-8"),
                Some("yes"),
            ))],
            root,
            epilog: Vec::new(),
        }
    }

    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root = None;
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf)?;
            match event {
                Event::Start(e) => stack.push(element_from_start(&e)?),
                Event::Empty(e) => {
                    let element = element_from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| NarratorError::xml("Unbalanced end tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                other => {
                    let owned = other.into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Other(owned)),
                        None if root.is_none() => prolog.push(owned),
                        None => epilog.push(owned),
                    }
                }
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(NarratorError::xml("Unclosed element at end of document"));
        }

        let root = root.ok_or_else(|| NarratorError::xml("Document has no root element"))?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.prolog {
            write_event(&mut writer, event.clone())?;
        }
        self.root.write_to(&mut writer)?;
        for event in &self.epilog {
            write_event(&mut writer, event.clone())?;
        }
        Ok(writer.into_inner())
    }
}

pub fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Escape an attribute value. Tab, LF and CR become character references.
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\t', "&#x9;")
        .replace('\n', "&#xA;")
        .replace('\r', "&#xD;")
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| NarratorError::xml(e.to_string()))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| NarratorError::xml(e.to_string()))?
            .to_string();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(NarratorError::xml("Multiple root elements")),
    }
    Ok(())
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| NarratorError::xml(e.to_string()))
}
