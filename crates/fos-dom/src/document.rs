//! Document - High-level document API

use crate::{DomError, DomResult, DomTree, NodeId};

/// Nodes making up an empty document: #document, html, head, title, body
const SKELETON_NODES: usize = 5;

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <title> element
    title_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new empty document
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let root = tree.root();

        // The tree is unbounded here, so the skeleton cannot fail to allocate
        let mut skeleton = |tag: &str, parent: NodeId| -> NodeId {
            match tree
                .create_element(tag)
                .and_then(|id| tree.append_child(parent, id).map(|()| id))
            {
                Ok(id) => id,
                Err(err) => unreachable!("document skeleton: {err}"),
            }
        };
        let html = skeleton("html", root);
        let head = skeleton("head", html);
        let title = skeleton("title", head);
        let body = skeleton("body", html);

        tracing::debug!("document created for {}", url);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            title_element: title,
            body_element: body,
        }
    }

    /// Create a document that holds at most `max_nodes` elements besides its skeleton
    pub fn with_node_limit(url: &str, max_nodes: usize) -> Self {
        let mut doc = Self::new(url);
        doc.tree.set_node_limit(Some(SKELETON_NODES.saturating_add(max_nodes)));
        doc
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> &str {
        self.tree
            .element(self.title_element)
            .map(|el| el.text.as_str())
            .unwrap_or_default()
    }

    /// Set document title
    pub fn set_title(&mut self, title: &str) {
        if let Ok(el) = self.tree.element_mut(self.title_element) {
            el.text = title.to_string();
        }
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        self.tree.create_element(tag)
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.is_skeleton(child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.tree.append_child(parent, child)
    }

    /// Remove an element and its subtree; returns every freed id in pre-order
    pub fn remove(&mut self, id: NodeId) -> DomResult<Vec<NodeId>> {
        if self.is_skeleton(id) {
            return Err(DomError::InvalidOperation("cannot remove document structure"));
        }
        self.tree.remove(id)
    }

    /// Get text content
    pub fn text_content(&self, id: NodeId) -> DomResult<&str> {
        Ok(self.tree.element(id)?.text.as_str())
    }

    /// Set text content
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.tree.element_mut(id)?.text = text.to_string();
        Ok(())
    }

    /// Get attribute
    pub fn get_attribute(&self, id: NodeId, name: &str) -> DomResult<Option<&str>> {
        Ok(self.tree.element(id)?.get_attr(name))
    }

    /// Set attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.tree.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    /// Remove attribute; returns false if it was not set
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.tree.element_mut(id)?.remove_attr(name))
    }

    /// Get inline style property
    pub fn style(&self, id: NodeId, property: &str) -> DomResult<Option<&str>> {
        Ok(self.tree.element(id)?.get_style(property))
    }

    /// Set inline style property
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> DomResult<()> {
        self.tree.element_mut(id)?.set_style(property, value);
        Ok(())
    }

    /// Get the tag name of an element
    pub fn tag_name(&self, id: NodeId) -> DomResult<&str> {
        Ok(self.tree.element(id)?.tag.as_str())
    }

    /// Start delivering `event` for `id`; returns false if already subscribed
    pub fn add_event_listener(&mut self, id: NodeId, event: &str) -> DomResult<bool> {
        Ok(self.tree.element_mut(id)?.add_listener(event))
    }

    /// Stop delivering `event` for `id`; returns false if it was not subscribed
    pub fn remove_event_listener(&mut self, id: NodeId, event: &str) -> DomResult<bool> {
        Ok(self.tree.element_mut(id)?.remove_listener(event))
    }

    /// Check whether `event` is delivered for `id`
    pub fn has_event_listener(&self, id: NodeId, event: &str) -> bool {
        self.tree
            .element(id)
            .is_ok_and(|el| el.listeners.iter().any(|l| l == event))
    }

    /// Every element in document order whose tag matches (`*` for all)
    pub fn get_elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        self.tree.elements_by_tag(tag)
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id).and_then(|n| n.parent)
    }

    /// Direct children of a node
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.children(id).collect()
    }

    /// Check whether `id` still denotes a node
    pub fn contains(&self, id: NodeId) -> bool {
        self.tree.contains(id)
    }

    fn is_skeleton(&self, id: NodeId) -> bool {
        [
            self.tree.root(),
            self.html_element,
            self.head_element,
            self.title_element,
            self.body_element,
        ]
        .contains(&id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
