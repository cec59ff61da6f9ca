//! Widget handles
//!
//! [`Element`] is the untyped handle: a node identity plus the document it
//! lives in. [`Handle`] adds a compile-time [`Kind`] and derefs to
//! [`Element`] for every identity-based operation.
//!
//! Handles never own nodes. Dropping one leaves the node and any callbacks
//! registered through it in place; an identity whose node was removed keeps
//! reporting [`Error::Stale`].

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr;

use fos_dom::NodeId;

use crate::bridge::{Event, Registration};
use crate::document::Document;
use crate::kind::{Kind, WidgetKind};
use crate::registry::Parent;
use crate::{Error, Result};

/// Untyped handle to a node
#[derive(Clone, Copy)]
pub struct Element<'d> {
    doc: &'d Document,
    node: NodeId,
}

impl<'d> Element<'d> {
    pub(crate) fn new(doc: &'d Document, node: NodeId) -> Self {
        Self { doc, node }
    }

    /// Host identity of the node
    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Document this handle belongs to
    #[inline]
    pub fn document(&self) -> &'d Document {
        self.doc
    }

    /// Check whether the node still exists
    pub fn is_live(&self) -> bool {
        self.doc.registry().is_live(self.node)
    }

    /// Host tag name
    pub fn tag_name(&self) -> Result<String> {
        Ok(self.doc.registry().tag_name(self.node)?)
    }

    /// Kind recovered from the host tag; `None` for tags outside the
    /// taxonomy and for stale nodes
    pub fn kind(&self) -> Option<WidgetKind> {
        self.tag_name().ok().and_then(|tag| WidgetKind::from_tag(&tag))
    }

    /// Reinterpret as a typed handle, checking the host tag
    pub fn downcast<K: Kind>(self) -> Result<Handle<'d, K>> {
        let found = self.tag_name()?;
        if !K::KIND.tag_name().eq_ignore_ascii_case(&found) {
            return Err(Error::KindMismatch {
                node: self.node,
                expected: K::KIND,
                found,
            });
        }
        Ok(Handle::from_element(self))
    }

    /// Set text content
    pub fn text(&self, value: &str) -> Result<()> {
        self.doc.registry_mut().set_text(self.node, value)?;
        Ok(())
    }

    /// Set one inline style property
    pub fn style(&self, property: &str, value: &str) -> Result<()> {
        self.doc
            .registry_mut()
            .set_style(self.node, property, value)?;
        Ok(())
    }

    /// Set one attribute
    pub fn attr(&self, name: &str, value: &str) -> Result<()> {
        self.doc.registry_mut().set_attribute(self.node, name, value)?;
        Ok(())
    }

    /// Assign the node's identifier, taking it over from any other node
    pub fn id(&self, identifier: &str) -> Result<()> {
        self.doc
            .registry_mut()
            .set_attribute(self.node, "id", identifier)?;
        let previous = self.doc.index_mut().put(identifier, self.node);
        if let Some(previous) = previous.filter(|previous| *previous != self.node) {
            // Only the winning node keeps the host attribute
            let cleared = self.doc.registry_mut().remove_attribute(previous, "id");
            if let Err(err) = cleared {
                tracing::debug!("clearing id on {}: {}", previous, err);
            }
            tracing::debug!("id {:?} moved from {} to {}", identifier, previous, self.node);
        }
        Ok(())
    }

    /// Move `child` to the end of this node's children
    pub fn append<'c>(&self, child: impl Into<Element<'c>>) -> Result<()> {
        let child = child.into();
        if !ptr::eq(self.doc, child.doc) {
            return Err(Error::ForeignNode(child.node));
        }
        self.doc
            .registry_mut()
            .attach(child.node, Parent::Node(self.node))?;
        tracing::debug!("appended {} to {}", child.node, self.node);
        Ok(())
    }

    /// Register `callback` for `event` on this node, replacing any previous
    /// callback for the same event.
    ///
    /// The first registration for an event subscribes on the host; the
    /// callback stays registered after this handle is dropped.
    pub fn handle<F>(&self, event: &str, callback: F) -> Result<()>
    where
        F: FnMut(&Document, &Event) + 'static,
    {
        if !self.doc.registry().is_live(self.node) {
            self.doc.bridge().forget_node(self.node);
            return Err(Error::Stale(self.node));
        }
        if !self.doc.bridge().is_registered(self.node, event) {
            self.doc.registry_mut().subscribe(self.node, event)?;
        }
        match self.doc.bridge().register(self.node, event, callback) {
            Registration::New => tracing::debug!("{} handler registered on {}", event, self.node),
            Registration::Replaced => tracing::debug!("{} handler replaced on {}", event, self.node),
        }
        Ok(())
    }

    /// Deregister the callback for `event`; returns whether there was one
    pub fn unhandle(&self, event: &str) -> bool {
        if !self.doc.bridge().deregister(self.node, event) {
            return false;
        }
        if let Err(err) = self.doc.registry_mut().unsubscribe(self.node, event) {
            tracing::debug!("unsubscribe {} on {}: {}", event, self.node, err);
        }
        true
    }

    /// Remove the node and its subtree from the host.
    ///
    /// Callbacks and identifiers of every removed node are dropped.
    pub fn remove(self) -> Result<()> {
        let removed = self.doc.registry_mut().remove(self.node)?;
        for node in removed {
            self.doc.on_detached(node);
        }
        Ok(())
    }

    /// Text content
    pub fn text_content(&self) -> Result<String> {
        Ok(self.doc.registry().text_content(self.node)?)
    }

    /// Inline style property value
    pub fn style_value(&self, property: &str) -> Result<Option<String>> {
        Ok(self.doc.registry().style_value(self.node, property)?)
    }

    /// Attribute value
    pub fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.doc.registry().attribute(self.node, name)?)
    }

    /// Parent element, `None` when detached
    pub fn parent(&self) -> Result<Option<Element<'d>>> {
        let parent = self.doc.registry().parent(self.node)?;
        Ok(parent.map(|node| Element::new(self.doc, node)))
    }

    /// Direct children in order
    pub fn children(&self) -> Result<Vec<Element<'d>>> {
        let children = self.doc.registry().children(self.node)?;
        Ok(children
            .into_iter()
            .map(|node| Element::new(self.doc, node))
            .collect())
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.doc, other.doc) && self.node == other.node
    }
}

impl Eq for Element<'_> {}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.node).finish()
    }
}

/// Typed handle to a node of kind `K`
pub struct Handle<'d, K: Kind> {
    element: Element<'d>,
    _kind: PhantomData<fn() -> K>,
}

impl<'d, K: Kind> Handle<'d, K> {
    fn from_element(element: Element<'d>) -> Self {
        Self {
            element,
            _kind: PhantomData,
        }
    }

    /// Create a node of kind `K` and attach it to the document body
    pub fn create(doc: &'d Document) -> Result<Self> {
        let node = doc.create_attached(K::KIND.tag_name())?;
        tracing::debug!("created {} as {}", K::KIND, node);
        Ok(Self::from_element(Element::new(doc, node)))
    }

    /// Resolve the node registered under `identifier`
    pub fn from_id(doc: &'d Document, identifier: &str) -> Result<Self> {
        doc.element_by_id(identifier)?.downcast()
    }

    /// Kind of this handle
    #[inline]
    pub fn kind(&self) -> WidgetKind {
        K::KIND
    }

    /// Erase the kind
    #[inline]
    pub fn element(&self) -> Element<'d> {
        self.element
    }
}

impl<'d, K: Kind> Deref for Handle<'d, K> {
    type Target = Element<'d>;

    fn deref(&self) -> &Element<'d> {
        &self.element
    }
}

impl<K: Kind> Clone for Handle<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Kind> Copy for Handle<'_, K> {}

impl<K: Kind> PartialEq for Handle<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl<K: Kind> Eq for Handle<'_, K> {}

impl<K: Kind> fmt::Debug for Handle<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle")
            .field(&K::KIND)
            .field(&self.element.node)
            .finish()
    }
}

impl<'d, K: Kind> From<Handle<'d, K>> for Element<'d> {
    fn from(handle: Handle<'d, K>) -> Self {
        handle.element
    }
}

impl<'d, K: Kind> From<&Handle<'d, K>> for Element<'d> {
    fn from(handle: &Handle<'d, K>) -> Self {
        handle.element
    }
}

impl<'d> From<&Element<'d>> for Element<'d> {
    fn from(element: &Element<'d>) -> Self {
        *element
    }
}
