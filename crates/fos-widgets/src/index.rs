//! Identity & lookup index
//!
//! Maps explicit identifiers to node identities. Identifiers are unique by
//! convention only: assigning one that is already taken moves it to the new
//! node (last write wins).

use std::collections::HashMap;

use fos_dom::NodeId;

use crate::registry::Registry;

/// Identifier → identity index
#[derive(Debug, Default)]
pub struct IdIndex {
    by_identifier: HashMap<String, NodeId>,
    /// Reverse map so renaming or removing a node drops its old entry
    by_node: HashMap<NodeId, String>,
}

impl IdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `identifier` at `node`, returning the node it used to denote
    pub fn put(&mut self, identifier: &str, node: NodeId) -> Option<NodeId> {
        if let Some(old) = self.by_node.remove(&node) {
            if old != identifier && self.by_identifier.get(&old) == Some(&node) {
                self.by_identifier.remove(&old);
            }
        }

        let previous = self.by_identifier.insert(identifier.to_string(), node);
        if let Some(shadowed) = previous.filter(|prev| *prev != node) {
            if self.by_node.get(&shadowed).map(String::as_str) == Some(identifier) {
                self.by_node.remove(&shadowed);
            }
        }
        self.by_node.insert(node, identifier.to_string());
        previous
    }

    pub fn get(&self, identifier: &str) -> Option<NodeId> {
        self.by_identifier.get(identifier).copied()
    }

    /// Identifier currently resolving to `node`
    pub fn identifier_of(&self, node: NodeId) -> Option<&str> {
        self.by_node.get(&node).map(String::as_str)
    }

    /// Drop the mapping for a node that no longer exists
    pub fn remove_node(&mut self, node: NodeId) -> Option<String> {
        let identifier = self.by_node.remove(&node)?;
        if self.by_identifier.get(&identifier) == Some(&node) {
            self.by_identifier.remove(&identifier);
        }
        Some(identifier)
    }

    /// Snapshot of the attached nodes whose tag matches, in document order.
    ///
    /// The result is computed eagerly: nodes attached afterwards are not
    /// included, and nodes removed afterwards stay in it as stale ids.
    pub fn by_tag(registry: &dyn Registry, tag: &str) -> Vec<NodeId> {
        registry
            .query_by_tag(tag)
            .into_iter()
            .map(|(node, _)| node)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }
}
