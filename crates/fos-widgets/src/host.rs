//! In-process host
//!
//! Bridges the [`Registry`] interface to a `fos_dom::Document`.

use fos_dom::{Document as DomDocument, DomError, NodeId};

use crate::registry::{HostError, Parent, Registry};

impl From<DomError> for HostError {
    fn from(err: DomError) -> Self {
        match err {
            DomError::StaleNode(node) => HostError::Stale(node),
            DomError::HierarchyRequest { parent, child } => HostError::Hierarchy { parent, child },
            DomError::CapacityExceeded(limit) => {
                tracing::debug!("host node limit of {} reached", limit);
                HostError::Unavailable
            }
            // Callers that can hit this map it with the node in hand
            DomError::InvalidOperation(_) => HostError::Unavailable,
        }
    }
}

impl Registry for DomDocument {
    fn create_node(&mut self, tag: &str) -> Result<NodeId, HostError> {
        Ok(self.create_element(tag)?)
    }

    fn set_text(&mut self, node: NodeId, value: &str) -> Result<(), HostError> {
        Ok(self.set_text_content(node, value)?)
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<(), HostError> {
        Ok(DomDocument::set_style(self, node, property, value)?)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        Ok(DomDocument::set_attribute(self, node, name, value)?)
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), HostError> {
        DomDocument::remove_attribute(self, node, name)?;
        Ok(())
    }

    fn attach(&mut self, node: NodeId, parent: Parent) -> Result<(), HostError> {
        let parent = match parent {
            Parent::Body => DomDocument::body(self),
            Parent::Node(parent) => parent,
        };
        Ok(self.append_child(parent, node)?)
    }

    fn remove(&mut self, node: NodeId) -> Result<Vec<NodeId>, HostError> {
        DomDocument::remove(self, node).map_err(|err| match err {
            DomError::InvalidOperation(reason) => HostError::Rejected { node, reason },
            other => other.into(),
        })
    }

    fn subscribe(&mut self, node: NodeId, event: &str) -> Result<(), HostError> {
        self.add_event_listener(node, event)?;
        Ok(())
    }

    fn unsubscribe(&mut self, node: NodeId, event: &str) -> Result<(), HostError> {
        self.remove_event_listener(node, event)?;
        Ok(())
    }

    fn query_by_tag(&self, tag: &str) -> Vec<(NodeId, String)> {
        self.get_elements_by_tag_name(tag)
            .into_iter()
            .filter_map(|id| {
                let tag = DomDocument::tag_name(self, id).ok()?;
                Some((id, tag.to_string()))
            })
            .collect()
    }

    fn set_document_title(&mut self, value: &str) {
        self.set_title(value);
    }

    fn document_title(&self) -> String {
        self.title().to_string()
    }

    fn document_url(&self) -> String {
        self.url().to_string()
    }

    fn body(&self) -> NodeId {
        DomDocument::body(self)
    }

    fn is_live(&self, node: NodeId) -> bool {
        self.contains(node)
    }

    fn tag_name(&self, node: NodeId) -> Result<String, HostError> {
        Ok(DomDocument::tag_name(self, node)?.to_string())
    }

    fn text_content(&self, node: NodeId) -> Result<String, HostError> {
        Ok(DomDocument::text_content(self, node)?.to_string())
    }

    fn style_value(&self, node: NodeId, property: &str) -> Result<Option<String>, HostError> {
        Ok(self.style(node, property)?.map(str::to_string))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, HostError> {
        Ok(self.get_attribute(node, name)?.map(str::to_string))
    }

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>, HostError> {
        if !self.contains(node) {
            return Err(HostError::Stale(node));
        }
        Ok(DomDocument::parent(self, node))
    }

    fn children(&self, node: NodeId) -> Result<Vec<NodeId>, HostError> {
        if !self.contains(node) {
            return Err(HostError::Stale(node));
        }
        Ok(DomDocument::children(self, node))
    }
}
