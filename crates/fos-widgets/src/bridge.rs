//! Event bridge
//!
//! Routes host event notifications to the callback registered for
//! `(node, event name)`. Each key has a single slot: registering again
//! replaces the callback instead of adding a second subscriber.
//!
//! Dispatch takes the callback out of the table before running it, so a
//! callback is free to register, replace or deregister any key (its own
//! included) while it runs. A callback is never re-entered: if it causes its
//! own key to fire synchronously, the nested notification is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use fos_dom::NodeId;

/// Host event notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Node the event fired on
    pub target: NodeId,
    /// Event name, e.g. `click`
    pub name: String,
}

impl Event {
    pub fn new(target: NodeId, name: &str) -> Self {
        Self {
            target,
            name: name.to_string(),
        }
    }
}

/// Outcome of [`EventBridge::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First callback for the key
    New,
    /// An existing callback was replaced
    Replaced,
}

/// Outcome of [`EventBridge::dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The callback ran
    Delivered,
    /// No callback for the key
    Dropped,
    /// The callback for the key is already running
    Busy,
}

type Callback<C> = Rc<RefCell<dyn FnMut(&C, &Event)>>;

/// `(node, event name) → callback` table
pub struct EventBridge<C> {
    table: RefCell<HashMap<NodeId, HashMap<String, Callback<C>>>>,
}

impl<C> EventBridge<C> {
    pub fn new() -> Self {
        Self {
            table: RefCell::new(HashMap::new()),
        }
    }

    /// Check whether a callback is registered for the key
    pub fn is_registered(&self, node: NodeId, event: &str) -> bool {
        self.table
            .borrow()
            .get(&node)
            .is_some_and(|slots| slots.contains_key(event))
    }

    /// Store `callback` for the key, replacing any previous one
    pub fn register<F>(&self, node: NodeId, event: &str, callback: F) -> Registration
    where
        F: FnMut(&C, &Event) + 'static,
    {
        let callback: Callback<C> = Rc::new(RefCell::new(callback));
        let previous = self
            .table
            .borrow_mut()
            .entry(node)
            .or_default()
            .insert(event.to_string(), callback);
        match previous {
            Some(_) => Registration::Replaced,
            None => Registration::New,
        }
    }

    /// Remove the callback for the key; returns whether there was one
    pub fn deregister(&self, node: NodeId, event: &str) -> bool {
        let mut table = self.table.borrow_mut();
        let Some(slots) = table.get_mut(&node) else {
            return false;
        };
        let removed = slots.remove(event).is_some();
        if slots.is_empty() {
            table.remove(&node);
        }
        removed
    }

    /// Remove every callback registered on a node; returns how many
    pub fn forget_node(&self, node: NodeId) -> usize {
        self.table
            .borrow_mut()
            .remove(&node)
            .map_or(0, |slots| slots.len())
    }

    /// Invoke the callback registered for the event, if any
    pub fn dispatch(&self, ctx: &C, event: &Event) -> Dispatch {
        let callback = {
            let table = self.table.borrow();
            match table.get(&event.target).and_then(|slots| slots.get(&event.name)) {
                Some(callback) => Rc::clone(callback),
                None => {
                    tracing::debug!("no handler for {} on {}, dropped", event.name, event.target);
                    return Dispatch::Dropped;
                }
            }
        };

        let Ok(mut callback) = callback.try_borrow_mut() else {
            tracing::warn!(
                "{} on {} fired from inside its own handler, dropped",
                event.name,
                event.target
            );
            return Dispatch::Busy;
        };
        tracing::debug!("dispatching {} on {}", event.name, event.target);
        (&mut *callback)(ctx, event);
        Dispatch::Delivered
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.table.borrow().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }
}

impl<C> Default for EventBridge<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventBridge<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBridge")
            .field("callbacks", &self.len())
            .finish()
    }
}
