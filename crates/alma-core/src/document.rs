//! Response document tree.
//!
//! Parsing code in this crate walks responses through the [`DocumentNode`]
//! trait rather than a concrete XML library. [`Document::parse`] builds an
//! owned [`Element`] tree with `roxmltree`; any other tree-shaped parser can
//! feed the same record and holdings extraction by implementing the trait.

use tracing::trace;

use crate::error::ParseError;

/// Read access to one element of a parsed response.
pub trait DocumentNode: Sized {
    /// The local tag name of this element.
    fn tag_name(&self) -> &str;

    /// The value of an attribute, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Child elements in document order.
    fn children(&self) -> &[Self];

    /// Concatenated text directly inside this element.
    fn text(&self) -> &str;

    /// The value of an attribute, or an empty string when it is absent.
    fn attr(&self, name: &str) -> &str {
        self.attribute(name).unwrap_or("")
    }

    /// All descendant elements with the given tag name, in document order.
    ///
    /// The node itself is never included.
    fn find_all(&self, tag: &str) -> Vec<&Self> {
        let mut found = Vec::new();
        collect_descendants(self, tag, &mut found);
        found
    }

    /// The first descendant element with the given tag name.
    fn find_first(&self, tag: &str) -> Option<&Self> {
        self.children().iter().find_map(|child| {
            if child.tag_name() == tag {
                Some(child)
            } else {
                child.find_first(tag)
            }
        })
    }
}

fn collect_descendants<'a, N: DocumentNode>(node: &'a N, tag: &str, found: &mut Vec<&'a N>) {
    for child in node.children() {
        if child.tag_name() == tag {
            found.push(child);
        }
        collect_descendants(child, tag, found);
    }
}

/// An owned XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Create an empty element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = Element::new(node.tag_name().name());
        element.attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();

        for child in node.children() {
            if child.is_element() {
                element.children.push(Element::from_node(child));
            } else if child.is_text()
                && let Some(text) = child.text()
            {
                element.text.push_str(text);
            }
        }

        element
    }
}

impl DocumentNode for Element {
    fn tag_name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// A parsed response document.
///
/// Searches on the document cover the root element as well as everything
/// beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    node: Element,
}

impl Document {
    /// Parse a response body.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the body is not UTF-8 or not well-formed XML.
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(body)
            .map_err(|e| ParseError::new(format!("response is not valid UTF-8: {e}")))?;

        let doc = roxmltree::Document::parse(text)
            .map_err(|e| ParseError::new(format!("malformed response document: {e}")))?;

        let root = Element::from_node(doc.root_element());
        trace!(root = %root.tag_name(), "parsed response document");

        Ok(Self::from_root(root))
    }

    /// Wrap an already built root element.
    pub fn from_root(root: Element) -> Self {
        Self {
            node: Element::new("#document").with_child(root),
        }
    }

    /// The document's root element.
    pub fn root_element(&self) -> &Element {
        // from_root always installs exactly one child
        &self.node.children[0]
    }

    /// All elements with the given tag name, root included, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        self.node.find_all(tag)
    }

    /// The first element with the given tag name, root included.
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        self.node.find_first(tag)
    }

    /// Text of the first element with the given tag name, if any.
    pub fn text_of(&self, tag: &str) -> Option<&str> {
        self.find_first(tag).map(|e| e.text().trim())
    }
}
