//! fOS DOM - Document Object Model
//!
//! Arena-allocated document tree. Nodes are addressed by generational
//! [`NodeId`]s: removing a node invalidates every copy of its id, and a
//! recycled slot never answers to an old one.

mod arena;
mod document;
mod node;
mod tree;

pub use arena::GenArena;
pub use document::Document;
pub use node::{ElementData, Node, NodeData, Property};
pub use tree::{Children, Descendants, DomTree};

use std::fmt;

/// Node identifier (slot index + generation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was handed out
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0} does not exist")]
    StaleNode(NodeId),

    #[error("cannot insert {child} under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("node limit of {0} reached")]
    CapacityExceeded(usize),

    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
}
