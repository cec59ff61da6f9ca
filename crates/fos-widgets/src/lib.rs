//! fOS Widgets
//!
//! Typed handles over a live, host-owned document tree.
//!
//! Features:
//! - Closed widget taxonomy checked at compile time (`Handle<'_, Button>`)
//! - Handles are plain `Copy` keys; the host owns every node
//! - Single-slot event callbacks per (node, event), dispatched synchronously
//! - Lookup by identifier (`from_id`) and by tag (`elems_by_tag`)
//!
//! # Example
//! ```
//! use fos_widgets::{Document, Handle};
//! use fos_widgets::kind::{Button, Div};
//!
//! # fn main() -> fos_widgets::Result<()> {
//! let doc = Document::new();
//! doc.title("Hello");
//!
//! let panel = doc.create::<Div>()?;
//! let button = doc.create::<Button>()?;
//! button.text("Increment!")?;
//! panel.append(button)?;
//!
//! let result = doc.create::<Div>()?;
//! result.id("result")?;
//! button.handle("click", |doc, _event| {
//!     if let Ok(result) = Handle::<Div>::from_id(doc, "result") {
//!         let _ = result.text("clicked");
//!     }
//! })?;
//!
//! doc.on_event(button.node_id(), "click");
//! assert_eq!(result.text_content()?, "clicked");
//! # Ok(())
//! # }
//! ```

pub mod bridge;
mod config;
mod document;
mod handle;
mod host;
pub mod index;
pub mod kind;
pub mod registry;

pub use bridge::{Dispatch, Event, EventBridge, Registration};
pub use config::Config;
pub use document::Document;
pub use fos_dom::NodeId;
pub use handle::{Element, Handle};
pub use index::IdIndex;
pub use kind::{Kind, WidgetKind};
pub use registry::{HostError, Parent, Registry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for widget operations
pub type Result<T> = std::result::Result<T, Error>;

/// Widget errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("host unavailable")]
    HostUnavailable,

    #[error("node {0} is no longer live")]
    Stale(NodeId),

    #[error("no element with id {0:?}")]
    NotFound(String),

    #[error("node {node} is <{found}>, expected {expected}")]
    KindMismatch {
        node: NodeId,
        expected: WidgetKind,
        found: String,
    },

    #[error("cannot append {child} to {parent}")]
    Hierarchy { parent: NodeId, child: NodeId },

    #[error("host rejected operation on {node}: {reason}")]
    Rejected { node: NodeId, reason: &'static str },

    #[error("node {0} belongs to another document")]
    ForeignNode(NodeId),
}

impl From<HostError> for Error {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Unavailable => Error::HostUnavailable,
            HostError::Stale(node) => Error::Stale(node),
            HostError::Hierarchy { parent, child } => Error::Hierarchy { parent, child },
            HostError::Rejected { node, reason } => Error::Rejected { node, reason },
        }
    }
}
