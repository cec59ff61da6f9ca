//! Document - entry point for calling code
//!
//! Owns the registry, the identifier index and the event bridge. Nothing is
//! global: two documents never see each other's nodes, identifiers or
//! callbacks.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

use fos_dom::{Document as DomDocument, NodeId};

use crate::bridge::{Dispatch, Event, EventBridge};
use crate::config::Config;
use crate::handle::{Element, Handle};
use crate::index::IdIndex;
use crate::kind::Kind;
use crate::registry::{Parent, Registry};
use crate::{Error, Result};

/// Widget document
pub struct Document {
    registry: RefCell<Box<dyn Registry>>,
    index: RefCell<IdIndex>,
    bridge: EventBridge<Document>,
}

impl Document {
    /// Create a document backed by an in-process host
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a document backed by an in-process host configured by `config`
    pub fn with_config(config: Config) -> Self {
        let mut host = match config.max_nodes {
            Some(max) => DomDocument::with_node_limit(&config.url, max),
            None => DomDocument::new(&config.url),
        };
        if !config.title.is_empty() {
            host.set_title(&config.title);
        }
        Self::with_registry(host)
    }

    /// Create a document on top of any host
    pub fn with_registry(registry: impl Registry + 'static) -> Self {
        tracing::info!("widget document created");
        Self {
            registry: RefCell::new(Box::new(registry)),
            index: RefCell::new(IdIndex::new()),
            bridge: EventBridge::new(),
        }
    }

    /// Set the document title
    pub fn title(&self, value: &str) {
        self.registry_mut().set_document_title(value);
    }

    /// Current document title
    pub fn current_title(&self) -> String {
        self.registry().document_title()
    }

    /// Document URL
    pub fn url(&self) -> String {
        self.registry().document_url()
    }

    /// Create a widget of kind `K`, attached to the body
    pub fn create<K: Kind>(&self) -> Result<Handle<'_, K>> {
        Handle::create(self)
    }

    /// Create an element for a tag outside the widget taxonomy, attached to the body
    pub fn create_element(&self, tag: &str) -> Result<Element<'_>> {
        let node = self.create_attached(tag)?;
        Ok(Element::new(self, node))
    }

    /// Allocate a node and attach it to the body; a node that cannot be
    /// attached is freed again
    pub(crate) fn create_attached(&self, tag: &str) -> Result<NodeId> {
        let node = self.registry_mut().create_node(tag)?;
        let attached = self.registry_mut().attach(node, Parent::Body);
        if let Err(err) = attached {
            let freed = self.registry_mut().remove(node);
            if let Err(cleanup) = freed {
                tracing::warn!("could not free {} after failed attach: {}", node, cleanup);
            }
            return Err(err.into());
        }
        Ok(node)
    }

    /// Default container new widgets are attached to
    pub fn body(&self) -> Element<'_> {
        let body = self.registry().body();
        Element::new(self, body)
    }

    /// Resolve `identifier` to a typed handle
    pub fn from_id<K: Kind>(&self, identifier: &str) -> Result<Handle<'_, K>> {
        Handle::from_id(self, identifier)
    }

    /// Resolve `identifier` without checking the kind
    pub fn element_by_id(&self, identifier: &str) -> Result<Element<'_>> {
        let node = self
            .index()
            .get(identifier)
            .ok_or_else(|| Error::NotFound(identifier.to_string()))?;
        if !self.registry().is_live(node) {
            // The host removed it without telling us
            self.on_detached(node);
            return Err(Error::NotFound(identifier.to_string()));
        }
        Ok(Element::new(self, node))
    }

    /// Snapshot of attached elements with a matching tag, in document order.
    ///
    /// `*` matches every element. See [`IdIndex::by_tag`] for the snapshot
    /// contract.
    pub fn elems_by_tag(&self, tag: &str) -> Vec<Element<'_>> {
        let nodes = IdIndex::by_tag(&*self.registry(), tag);
        nodes.into_iter().map(|node| Element::new(self, node)).collect()
    }

    /// Snapshot of attached widgets of kind `K`, in document order
    pub fn elems_by_kind<K: Kind>(&self) -> Vec<Handle<'_, K>> {
        self.elems_by_tag(K::KIND.tag_name())
            .into_iter()
            .filter_map(|element| element.downcast().ok())
            .collect()
    }

    /// Host notification: `event` fired on `node`
    pub fn on_event(&self, node: NodeId, event: &str) -> Dispatch {
        if !self.registry().is_live(node) {
            tracing::warn!("{} on {} after the node was removed, dropped", event, node);
            self.on_detached(node);
            return Dispatch::Dropped;
        }
        self.bridge.dispatch(self, &Event::new(node, event))
    }

    /// Host notification: `node` was detached and will not come back.
    ///
    /// Drops its callbacks and identifier.
    pub fn on_detached(&self, node: NodeId) {
        let callbacks = self.bridge.forget_node(node);
        let identifier = self.index_mut().remove_node(node);
        if callbacks > 0 || identifier.is_some() {
            tracing::debug!(
                "{} detached, dropped {} handler(s) and id {:?}",
                node,
                callbacks,
                identifier
            );
        }
    }

    /// Number of live callback registrations
    pub fn handler_count(&self) -> usize {
        self.bridge.len()
    }

    /// Read access to the host.
    ///
    /// Do not hold the guard across widget operations.
    pub fn registry(&self) -> Ref<'_, dyn Registry + 'static> {
        Ref::map(self.registry.borrow(), |registry| &**registry)
    }

    pub(crate) fn registry_mut(&self) -> RefMut<'_, dyn Registry + 'static> {
        RefMut::map(self.registry.borrow_mut(), |registry| &mut **registry)
    }

    pub(crate) fn index(&self) -> Ref<'_, IdIndex> {
        self.index.borrow()
    }

    pub(crate) fn index_mut(&self) -> RefMut<'_, IdIndex> {
        self.index.borrow_mut()
    }

    pub(crate) fn bridge(&self) -> &EventBridge<Document> {
        &self.bridge
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("identifiers", &self.index.borrow().len())
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{Button, Div, Span};
    use crate::registry::HostError;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Host wrapper counting subscription requests
    struct CountingHost {
        inner: DomDocument,
        subscribes: Rc<Cell<usize>>,
        created: Rc<RefCell<Vec<NodeId>>>,
        refuse_attach: bool,
    }

    impl Registry for CountingHost {
        fn create_node(&mut self, tag: &str) -> std::result::Result<NodeId, HostError> {
            let node = self.inner.create_node(tag)?;
            self.created.borrow_mut().push(node);
            Ok(node)
        }
        fn set_text(&mut self, node: NodeId, value: &str) -> std::result::Result<(), HostError> {
            self.inner.set_text(node, value)
        }
        fn set_style(&mut self, node: NodeId, p: &str, v: &str) -> std::result::Result<(), HostError> {
            Registry::set_style(&mut self.inner, node, p, v)
        }
        fn set_attribute(&mut self, node: NodeId, n: &str, v: &str) -> std::result::Result<(), HostError> {
            Registry::set_attribute(&mut self.inner, node, n, v)
        }
        fn remove_attribute(&mut self, node: NodeId, n: &str) -> std::result::Result<(), HostError> {
            Registry::remove_attribute(&mut self.inner, node, n)
        }
        fn attach(&mut self, node: NodeId, parent: Parent) -> std::result::Result<(), HostError> {
            if self.refuse_attach {
                return Err(HostError::Unavailable);
            }
            self.inner.attach(node, parent)
        }
        fn remove(&mut self, node: NodeId) -> std::result::Result<Vec<NodeId>, HostError> {
            Registry::remove(&mut self.inner, node)
        }
        fn subscribe(&mut self, node: NodeId, event: &str) -> std::result::Result<(), HostError> {
            self.subscribes.set(self.subscribes.get() + 1);
            self.inner.subscribe(node, event)
        }
        fn unsubscribe(&mut self, node: NodeId, event: &str) -> std::result::Result<(), HostError> {
            self.inner.unsubscribe(node, event)
        }
        fn query_by_tag(&self, tag: &str) -> Vec<(NodeId, String)> {
            self.inner.query_by_tag(tag)
        }
        fn set_document_title(&mut self, value: &str) {
            self.inner.set_document_title(value);
        }
        fn document_title(&self) -> String {
            self.inner.document_title()
        }
        fn document_url(&self) -> String {
            self.inner.document_url()
        }
        fn body(&self) -> NodeId {
            Registry::body(&self.inner)
        }
        fn is_live(&self, node: NodeId) -> bool {
            self.inner.is_live(node)
        }
        fn tag_name(&self, node: NodeId) -> std::result::Result<String, HostError> {
            Registry::tag_name(&self.inner, node)
        }
        fn text_content(&self, node: NodeId) -> std::result::Result<String, HostError> {
            Registry::text_content(&self.inner, node)
        }
        fn style_value(&self, node: NodeId, p: &str) -> std::result::Result<Option<String>, HostError> {
            self.inner.style_value(node, p)
        }
        fn attribute(&self, node: NodeId, n: &str) -> std::result::Result<Option<String>, HostError> {
            self.inner.attribute(node, n)
        }
        fn parent(&self, node: NodeId) -> std::result::Result<Option<NodeId>, HostError> {
            Registry::parent(&self.inner, node)
        }
        fn children(&self, node: NodeId) -> std::result::Result<Vec<NodeId>, HostError> {
            Registry::children(&self.inner, node)
        }
    }

    fn counting_document() -> (Document, Rc<Cell<usize>>) {
        let subscribes = Rc::new(Cell::new(0));
        let host = CountingHost {
            inner: DomDocument::default(),
            subscribes: Rc::clone(&subscribes),
            created: Rc::default(),
            refuse_attach: false,
        };
        (Document::with_registry(host), subscribes)
    }

    /// Document whose host allocates nodes but refuses to attach them
    fn refusing_document() -> (Document, Rc<RefCell<Vec<NodeId>>>) {
        let created = Rc::new(RefCell::new(Vec::new()));
        let host = CountingHost {
            inner: DomDocument::default(),
            subscribes: Rc::default(),
            created: Rc::clone(&created),
            refuse_attach: true,
        };
        (Document::with_registry(host), created)
    }

    #[test]
    fn test_title() {
        let doc = Document::new();
        doc.title("Hello");
        assert_eq!(doc.current_title(), "Hello");
        doc.title("World");
        assert_eq!(doc.current_title(), "World");
    }

    #[test]
    fn test_config() {
        let doc = Document::with_config(Config {
            title: "Counter".to_string(),
            max_nodes: Some(1),
            ..Config::default()
        });
        assert_eq!(doc.current_title(), "Counter");
        assert_eq!(doc.url(), "about:blank");
        assert!(doc.create::<Div>().is_ok());

        let before = doc.elems_by_tag("*").len();
        assert_eq!(doc.create::<Button>().unwrap_err(), Error::HostUnavailable);
        assert_eq!(doc.elems_by_tag("*").len(), before);
        assert!(doc.elems_by_tag("BUTTON").is_empty());
    }

    #[test]
    fn test_unbounded_config_limit() {
        let doc = Document::with_config(Config {
            url: "app://counter".to_string(),
            max_nodes: Some(usize::MAX),
            ..Config::default()
        });
        assert_eq!(doc.url(), "app://counter");
        assert!(doc.create::<Div>().is_ok());
    }

    #[test]
    fn test_failed_attach_frees_node() {
        let (doc, created) = refusing_document();

        assert_eq!(doc.create::<Div>().unwrap_err(), Error::HostUnavailable);
        assert_eq!(doc.create_element("canvas").unwrap_err(), Error::HostUnavailable);

        let created = created.borrow();
        assert_eq!(created.len(), 2);
        for node in created.iter() {
            assert!(!doc.registry().is_live(*node));
        }
    }

    #[test]
    fn test_subscribe_once_per_key() {
        let (doc, subscribes) = counting_document();
        let button = doc.create::<Button>().unwrap();

        button.handle("click", |_, _| {}).unwrap();
        button.handle("click", |_, _| {}).unwrap();
        assert_eq!(subscribes.get(), 1);

        button.handle("mouseover", |_, _| {}).unwrap();
        assert_eq!(subscribes.get(), 2);
        assert_eq!(doc.handler_count(), 2);

        // A fresh registration after deregistering subscribes again
        button.unhandle("click");
        button.handle("click", |_, _| {}).unwrap();
        assert_eq!(subscribes.get(), 3);
    }

    #[test]
    fn test_from_id_errors() {
        let doc = Document::new();
        let span = doc.create::<Span>().unwrap();
        span.id("label").unwrap();

        assert_eq!(
            doc.from_id::<Div>("missing").unwrap_err(),
            Error::NotFound("missing".to_string())
        );
        assert!(matches!(
            doc.from_id::<Div>("label"),
            Err(Error::KindMismatch { expected: crate::WidgetKind::Div, .. })
        ));
        assert_eq!(doc.from_id::<Span>("label").unwrap(), span);
    }

    #[test]
    fn test_removed_node_is_not_found() {
        let doc = Document::new();
        let div = doc.create::<Div>().unwrap();
        div.id("gone").unwrap();
        div.remove().unwrap();

        assert_eq!(
            doc.element_by_id("gone").unwrap_err(),
            Error::NotFound("gone".to_string())
        );
    }

    #[test]
    fn test_host_side_removal_purges_lazily() {
        let doc = Document::new();
        let div = doc.create::<Div>().unwrap();
        div.id("x").unwrap();
        div.handle("click", |_, _| {}).unwrap();
        // Removed behind the widget layer's back
        Registry::remove(&mut *doc.registry_mut(), div.node_id()).unwrap();

        assert!(doc.element_by_id("x").is_err());
        assert_eq!(doc.handler_count(), 0);
    }

    #[test]
    fn test_event_for_removed_node_is_dropped() {
        let doc = Document::new();
        let button = doc.create::<Button>().unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        button
            .handle("click", move |_, _| counter.set(counter.get() + 1))
            .unwrap();
        Registry::remove(&mut *doc.registry_mut(), button.node_id()).unwrap();

        assert_eq!(doc.on_event(button.node_id(), "click"), Dispatch::Dropped);
        assert_eq!(hits.get(), 0);
        assert_eq!(doc.handler_count(), 0);
    }

    #[test]
    fn test_on_detached() {
        let doc = Document::new();
        let button = doc.create::<Button>().unwrap();
        button.id("btn").unwrap();
        button.handle("click", |_, _| {}).unwrap();

        doc.on_detached(button.node_id());
        assert_eq!(doc.handler_count(), 0);
        assert_eq!(doc.on_event(button.node_id(), "click"), Dispatch::Dropped);
    }

    #[test]
    fn test_remove_purges_subtree() {
        let doc = Document::new();
        let panel = doc.create::<Div>().unwrap();
        let button = doc.create::<Button>().unwrap();
        panel.append(button).unwrap();
        button.id("inner").unwrap();
        button.handle("click", |_, _| {}).unwrap();

        panel.remove().unwrap();
        assert_eq!(doc.handler_count(), 0);
        assert!(doc.element_by_id("inner").is_err());
        assert!(doc.elems_by_tag("BUTTON").is_empty());
    }

    #[test]
    fn test_elems_by_kind() {
        let doc = Document::new();
        let a = doc.create::<Button>().unwrap();
        let _ = doc.create::<Div>().unwrap();
        let b = doc.create::<Button>().unwrap();

        assert_eq!(doc.elems_by_kind::<Button>(), vec![a, b]);
    }

    #[test]
    fn test_untyped_elements() {
        let doc = Document::new();
        let canvas = doc.create_element("canvas").unwrap();
        canvas.style("width", "100px").unwrap();

        let found = doc.elems_by_tag("CANVAS");
        assert_eq!(found, vec![canvas]);
        assert_eq!(found[0].kind(), None);
        assert_eq!(found[0].style_value("width").unwrap().as_deref(), Some("100px"));
    }

    #[test]
    fn test_documents_are_independent() {
        let first = Document::new();
        let second = Document::new();
        first.create::<Div>().unwrap().id("x").unwrap();

        assert!(second.element_by_id("x").is_err());
        assert!(second.elems_by_tag("DIV").is_empty());
    }
}
