//! DOM Tree (arena-based allocation)

use crate::arena::GenArena;
use crate::node::{ElementData, Node};
use crate::{DomError, DomResult, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: GenArena<Node>,
    root: NodeId,
    /// Maximum number of live nodes, document node included
    node_limit: Option<usize>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        let mut nodes = GenArena::new();
        let root = nodes.insert(Node::document());
        Self { nodes, root, node_limit: None }
    }

    /// Refuse to grow past `limit` live nodes (`None` = unbounded)
    pub fn set_node_limit(&mut self, limit: Option<usize>) {
        self.node_limit = limit;
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Check whether `id` still denotes a node
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Element data, or `StaleNode` for dead ids and the document node
    pub fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        self.get(id)
            .and_then(Node::as_element)
            .ok_or(DomError::StaleNode(id))
    }

    /// Mutable element data
    pub fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.get_mut(id)
            .and_then(Node::as_element_mut)
            .ok_or(DomError::StaleNode(id))
    }

    /// Allocate a detached element
    pub fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        if let Some(limit) = self.node_limit {
            if self.nodes.len() >= limit {
                return Err(DomError::CapacityExceeded(limit));
            }
        }
        let id = self.nodes.insert(Node::element(tag));
        tracing::trace!("created <{}> as {}", tag, id);
        Ok(id)
    }

    /// Move `child` to be the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if !self.contains(parent) {
            return Err(DomError::StaleNode(parent));
        }
        if !self.contains(child) {
            return Err(DomError::StaleNode(child));
        }
        if child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let prev_last = self.nodes.get(parent).and_then(|p| p.last_child);
        if let Some(last) = prev_last {
            if let Some(node) = self.nodes.get_mut(last) {
                node.next_sibling = Some(child);
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
            node.prev_sibling = prev_last;
            node.next_sibling = None;
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            if node.first_child.is_none() {
                node.first_child = Some(child);
            }
            node.last_child = Some(child);
        }
        Ok(())
    }

    /// Unlink a node from its parent and siblings; no-op when already detached
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let parent = node.parent.take();
        let prev = node.prev_sibling.take();
        let next = node.next_sibling.take();

        if let Some(prev) = prev {
            if let Some(n) = self.nodes.get_mut(prev) {
                n.next_sibling = next;
            }
        }
        if let Some(next) = next {
            if let Some(n) = self.nodes.get_mut(next) {
                n.prev_sibling = prev;
            }
        }
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(parent) {
                if p.first_child == Some(id) {
                    p.first_child = next;
                }
                if p.last_child == Some(id) {
                    p.last_child = prev;
                }
            }
        }
    }

    /// Detach `id` and free it with its whole subtree.
    ///
    /// Returns the freed ids in pre-order, `id` first.
    pub fn remove(&mut self, id: NodeId) -> DomResult<Vec<NodeId>> {
        if id == self.root {
            return Err(DomError::InvalidOperation("cannot remove the document node"));
        }
        if !self.contains(id) {
            return Err(DomError::StaleNode(id));
        }
        self.detach(id);
        let removed: Vec<NodeId> = self.descendants(id).collect();
        for node in &removed {
            self.nodes.remove(*node);
        }
        Ok(removed)
    }

    /// Check whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Iterate over the direct children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).and_then(|n| n.first_child),
        }
    }

    /// Iterate over `id` and everything below it in document order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Every element under the document node whose tag matches, in document order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|id| {
                self.get(*id)
                    .and_then(Node::as_element)
                    .is_some_and(|el| el.has_tag(tag))
            })
            .collect()
    }

    /// Number of live nodes in the tree, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.get(id).and_then(|n| n.next_sibling);
        Some(id)
    }
}

/// Pre-order iterator over a subtree
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push children in reverse so the first child is visited next
        let mut child = self.tree.get(id).and_then(|n| n.last_child);
        while let Some(c) = child {
            self.stack.push(c);
            child = self.tree.get(c).and_then(|n| n.prev_sibling);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tree: &mut DomTree, tag: &str) -> NodeId {
        tree.create_element(tag).unwrap()
    }

    #[test]
    fn test_append_order() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let a = element(&mut tree, "div");
        let b = element(&mut tree, "span");
        let c = element(&mut tree, "p");
        tree.append_child(root, a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(a, c).unwrap();

        assert_eq!(tree.children(a).collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(tree.descendants(root).collect::<Vec<_>>(), vec![root, a, b, c]);
    }

    #[test]
    fn test_append_moves() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let a = element(&mut tree, "div");
        let b = element(&mut tree, "div");
        let child = element(&mut tree, "button");
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();
        tree.append_child(a, child).unwrap();
        tree.append_child(b, child).unwrap();

        assert_eq!(tree.children(a).count(), 0);
        assert_eq!(tree.children(b).collect::<Vec<_>>(), vec![child]);
        assert_eq!(tree.get(child).unwrap().parent, Some(b));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let ids: Vec<_> = (0..3).map(|_| element(&mut tree, "li")).collect();
        for id in &ids {
            tree.append_child(root, *id).unwrap();
        }
        tree.detach(ids[1]);

        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![ids[0], ids[2]]);
        assert_eq!(tree.get(ids[2]).unwrap().prev_sibling, Some(ids[0]));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let outer = element(&mut tree, "div");
        let inner = element(&mut tree, "div");
        tree.append_child(root, outer).unwrap();
        tree.append_child(outer, inner).unwrap();

        assert_eq!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { parent: inner, child: outer })
        );
        assert!(matches!(
            tree.append_child(outer, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            tree.append_child(outer, root),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let a = element(&mut tree, "div");
        let b = element(&mut tree, "span");
        tree.append_child(root, a).unwrap();
        tree.append_child(a, b).unwrap();

        let removed = tree.remove(a).unwrap();
        assert_eq!(removed, vec![a, b]);
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert_eq!(tree.children(root).count(), 0);
        assert_eq!(tree.remove(a), Err(DomError::StaleNode(a)));
    }

    #[test]
    fn test_elements_by_tag_skips_detached() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let attached = element(&mut tree, "button");
        let _detached = element(&mut tree, "button");
        tree.append_child(root, attached).unwrap();

        assert_eq!(tree.elements_by_tag("BUTTON"), vec![attached]);
        assert_eq!(tree.elements_by_tag("button"), vec![attached]);
    }

    #[test]
    fn test_node_limit() {
        let mut tree = DomTree::new();
        tree.set_node_limit(Some(2));
        let _ = element(&mut tree, "div");
        assert_eq!(tree.create_element("div"), Err(DomError::CapacityExceeded(2)));
        assert_eq!(tree.len(), 2);
    }
}
