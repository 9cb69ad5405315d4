//! Owned XML element trees
//!
//! Documents are parsed with `sxd-document` and immediately converted into
//! [`XmlNode`] values, so component definitions do not borrow from the parser
//! package and can be stored in the registry.

use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element};
use sxd_document::parser;

use crate::error::{EngineError, EngineResult};

/// An element with its attributes and element children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// Local tag name
    pub tag: String,
    /// Attributes
    pub attrs: Vec<(String, String)>,
    /// Element children; text and comments are dropped
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create an element without attributes or children
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given tag
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    fn from_element(element: Element<'_>) -> Self {
        let attrs = element
            .attributes()
            .into_iter()
            .map(|attr| (attr.name().local_part().to_string(), attr.value().to_string()))
            .collect();

        let children = element
            .children()
            .into_iter()
            .filter_map(|child| match child {
                ChildOfElement::Element(el) => Some(Self::from_element(el)),
                _ => None,
            })
            .collect();

        Self {
            tag: element.name().local_part().to_string(),
            attrs,
            children,
        }
    }
}

/// Parse a document and return its root element
pub fn parse_document(source: &str) -> EngineResult<XmlNode> {
    if source.trim().is_empty() {
        return Err(EngineError::Parse("document is empty".to_string()));
    }

    let package = parser::parse(source).map_err(|e| EngineError::Parse(format!("{e:?}")))?;
    let document = package.as_document();

    document
        .root()
        .children()
        .into_iter()
        .find_map(|child| match child {
            ChildOfRoot::Element(el) => Some(XmlNode::from_element(el)),
            _ => None,
        })
        .ok_or_else(|| EngineError::Parse("document has no root element".to_string()))
}
