//! Owned XML tree used for schema-agnostic lookups
//!
//! EFetch documents are read into a small tree of [`XmlNode`]s with `quick_xml`'s
//! pull reader. Lookups search the tree recursively, so record fields are found
//! no matter how deeply NCBI nests them.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{PubMedError, Result};

/// A piece of element content, kept in document order so mixed content
/// like `CO<sub>2</sub> levels` flattens back into the right text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlContent {
    Element(XmlNode),
    Text(String),
}

/// An element with its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub content: Vec<XmlContent>,
}

impl XmlNode {
    /// Create an empty element
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            content: Vec::new(),
        }
    }

    /// Parse a complete XML document and return its root element
    ///
    /// # Errors
    ///
    /// Returns `PubMedError::XmlError` for mismatched or unclosed tags, invalid
    /// escapes, non-whitespace text outside the root, more than one root, or a
    /// document without any element.
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_papers::xml::XmlNode;
    ///
    /// let root = XmlNode::parse("<Set><Item><Name>a</Name></Item></Set>").unwrap();
    /// assert_eq!(root.find("Name").map(|n| n.text_content()), Some("a".to_string()));
    /// ```
    pub fn parse(xml: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().expand_empty_elements = true;

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                PubMedError::XmlError(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(ref e) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(PubMedError::XmlError(
                            "document has more than one root element".to_string(),
                        ));
                    }
                    stack.push(Self::from_start(e)?);
                }
                Event::End(ref e) => {
                    let node = stack.pop().ok_or_else(|| {
                        PubMedError::XmlError(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        ))
                    })?;
                    close_element(&mut stack, &mut root, node)?;
                }
                Event::Text(ref e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| PubMedError::XmlError(err.to_string()))?;
                    push_text(&mut stack, text)?;
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    push_text(&mut stack, String::from_utf8_lossy(&bytes))?;
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and DOCTYPE carry no fields
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(PubMedError::XmlError(format!(
                "unclosed element <{}>",
                open.name
            )));
        }

        root.ok_or_else(|| PubMedError::XmlError("document has no root element".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<XmlNode> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| PubMedError::XmlError(e.to_string()))?
            .to_string();

        Ok(XmlNode::new(name))
    }

    /// Direct child elements
    pub fn children(&self) -> impl Iterator<Item = &XmlNode> {
        self.content.iter().filter_map(|c| match c {
            XmlContent::Element(node) => Some(node),
            XmlContent::Text(_) => None,
        })
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children().find(|c| c.name == name)
    }

    /// All elements below this one in document order (pre-order), excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&XmlNode> = self.children().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// First descendant with the given name, at any depth
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.descendants().find(|n| n.name == name)
    }

    /// Every descendant with the given name, at any depth, in document order
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.descendants().filter(move |n| n.name == name)
    }

    /// First node matching `path`: a descendant named `path[0]` at any depth
    /// followed by direct-child steps for the remaining names.
    ///
    /// `find_path(&["Abstract", "AbstractText"])` behaves like the XPath
    /// `.//Abstract/AbstractText`.
    pub fn find_path(&self, path: &[&str]) -> Option<&XmlNode> {
        let (first, rest) = path.split_first()?;
        self.descendants()
            .filter(|n| n.name == *first)
            .find_map(|anchor| anchor.resolve_children(rest))
    }

    fn resolve_children(&self, steps: &[&str]) -> Option<&XmlNode> {
        match steps.split_first() {
            None => Some(self),
            Some((step, rest)) => self
                .children()
                .filter(|c| c.name == *step)
                .find_map(|c| c.resolve_children(rest)),
        }
    }

    /// All text inside this element, with child markup dropped
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for item in &self.content {
            match item {
                XmlContent::Text(t) => out.push_str(t),
                XmlContent::Element(node) => node.collect_text(out),
            }
        }
    }

    /// Trimmed text content, or `None` when the element holds no text
    pub fn trimmed_text(&self) -> Option<String> {
        let text = self.text_content();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn close_element(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.content.push(XmlContent::Element(node)),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(PubMedError::XmlError(
                "document has more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

fn push_text(stack: &mut [XmlNode], text: Cow<'_, str>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            if let Some(XmlContent::Text(prev)) = parent.content.last_mut() {
                prev.push_str(&text);
            } else {
                parent.content.push(XmlContent::Text(text.into_owned()));
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(PubMedError::XmlError(format!(
            "text outside of the root element: {:?}",
            text.trim()
        ))),
    }
}

/// Pre-order iterator over the elements below a node
pub struct Descendants<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let before = self.stack.len();
        self.stack.extend(node.children());
        self.stack[before..].reverse();
        Some(node)
    }
}
