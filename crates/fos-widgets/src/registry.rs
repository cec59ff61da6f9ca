//! Node Registry
//!
//! The host-side service that owns the real tree. Everything above this
//! trait only holds [`NodeId`]s; the registry alone knows which of them are
//! still live. The interface is kind-agnostic: it only ever sees tag names.

use fos_dom::NodeId;

/// Failures reported by a registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("host could not perform the operation")]
    Unavailable,

    #[error("node {0} is not live")]
    Stale(NodeId),

    #[error("cannot insert {child} under {parent}")]
    Hierarchy { parent: NodeId, child: NodeId },

    #[error("{node}: {reason}")]
    Rejected { node: NodeId, reason: &'static str },
}

/// Attachment target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The document's default container (the body)
    Body,
    Node(NodeId),
}

/// Host tree operations consumed by the widget layer
pub trait Registry {
    /// Allocate a detached node with the given tag
    fn create_node(&mut self, tag: &str) -> Result<NodeId, HostError>;

    fn set_text(&mut self, node: NodeId, value: &str) -> Result<(), HostError>;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<(), HostError>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError>;

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), HostError>;

    /// Detach `node` from its current parent and append it as the last child of `parent`
    fn attach(&mut self, node: NodeId, parent: Parent) -> Result<(), HostError>;

    /// Free `node` and its subtree; returns every freed id, `node` first
    fn remove(&mut self, node: NodeId) -> Result<Vec<NodeId>, HostError>;

    /// Ask the host to report `event` for `node`. Idempotent.
    fn subscribe(&mut self, node: NodeId, event: &str) -> Result<(), HostError>;

    fn unsubscribe(&mut self, node: NodeId, event: &str) -> Result<(), HostError>;

    /// Attached elements with a matching tag, in document order
    fn query_by_tag(&self, tag: &str) -> Vec<(NodeId, String)>;

    fn set_document_title(&mut self, value: &str);

    fn document_title(&self) -> String;

    fn document_url(&self) -> String;

    /// Default container new nodes are attached to
    fn body(&self) -> NodeId;

    fn is_live(&self, node: NodeId) -> bool;

    fn tag_name(&self, node: NodeId) -> Result<String, HostError>;

    fn text_content(&self, node: NodeId) -> Result<String, HostError>;

    fn style_value(&self, node: NodeId, property: &str) -> Result<Option<String>, HostError>;

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, HostError>;

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>, HostError>;

    fn children(&self, node: NodeId) -> Result<Vec<NodeId>, HostError>;
}
