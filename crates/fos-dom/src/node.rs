//! DOM Node
//!
//! Nodes are linked through [`NodeId`]s instead of pointers: parent, first and
//! last child (O(1) append), previous and next sibling.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (None if detached or root)
    pub parent: Option<NodeId>,
    /// First child
    pub first_child: Option<NodeId>,
    /// Last child (for O(1) append)
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    fn with_data(data: NodeData) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            NodeData::Document => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            NodeData::Document => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Tag name, upper-cased like `Element.tagName` in HTML documents
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<Property>,
    /// Inline style declarations in insertion order
    pub style: Vec<Property>,
    /// Text content owned by this element, rendered before its children
    pub text: String,
    /// Event names the embedder asked to be notified about
    pub listeners: Vec<String>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_uppercase(),
            attrs: Vec::new(),
            style: Vec::new(),
            text: String::new(),
            listeners: Vec::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        find(&self.attrs, name)
    }

    /// Set an attribute (last write wins)
    pub fn set_attr(&mut self, name: &str, value: &str) {
        upsert(&mut self.attrs, name, value);
    }

    /// Get an inline style value
    pub fn get_style(&self, property: &str) -> Option<&str> {
        find(&self.style, property)
    }

    /// Set an inline style property (last write wins)
    pub fn set_style(&mut self, property: &str, value: &str) {
        upsert(&mut self.style, property, value);
    }

    /// Remove an attribute; returns false if it was not set
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|p| p.name != name);
        self.attrs.len() != before
    }

    /// Check whether the tag matches, `*` matching every element
    pub fn has_tag(&self, tag: &str) -> bool {
        tag == "*" || self.tag.eq_ignore_ascii_case(tag)
    }

    /// Record a listener; returns false if it was already present
    pub fn add_listener(&mut self, event: &str) -> bool {
        if self.listeners.iter().any(|l| l == event) {
            return false;
        }
        self.listeners.push(event.to_string());
        true
    }

    /// Drop a listener; returns false if there was none
    pub fn remove_listener(&mut self, event: &str) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l != event);
        self.listeners.len() != before
    }
}

/// Name/value pair used for attributes and style declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

fn find<'a>(props: &'a [Property], name: &str) -> Option<&'a str> {
    props.iter().find(|p| p.name == name).map(|p| p.value.as_str())
}

fn upsert(props: &mut Vec<Property>, name: &str, value: &str) {
    match props.iter_mut().find(|p| p.name == name) {
        Some(p) => p.value = value.to_string(),
        None => props.push(Property {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
