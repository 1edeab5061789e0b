//! Handler registry: per-target, per-kind ordered callback lists.
//!
//! [`HandlerRegistry`] stores every handler in one slotmap and keeps an index
//! from `(Target, EventKind)` to the handler ids in registration order. The
//! dispatcher on [`Ui`](crate::ui::Ui) asks for a snapshot of the list, so a
//! handler may add or remove handlers while it runs.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use super::data::{Event, Target};
use super::kind::EventKind;
use crate::error::HandlerError;
use crate::ui::Ui;

new_key_type! {
    /// Opaque handle returned by registration, used to unregister.
    pub struct HandlerId;
}

/// An event callback.
///
/// Handlers get the whole [`Ui`] so they can mutate widgets, repaint, move
/// focus or dispatch further events.
pub type Handler = Rc<dyn Fn(&mut Ui, &mut Event<'_>) -> Result<(), HandlerError>>;

struct Entry {
    target: Target,
    kind: EventKind,
    handler: Handler,
}

/// All registered handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: SlotMap<HandlerId, Entry>,
    index: HashMap<(Target, EventKind), Vec<HandlerId>>,
}

impl HandlerRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the list for `(target, kind)`.
    pub fn add(&mut self, target: Target, kind: EventKind, handler: Handler) -> HandlerId {
        let id = self.entries.insert(Entry { target, kind, handler });
        self.index.entry((target, kind)).or_default().push(id);
        id
    }

    /// Unregister a handler. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: HandlerId) -> bool {
        let Some(entry) = self.entries.remove(id) else {
            return false;
        };
        let key = (entry.target, entry.kind);
        if let Some(ids) = self.index.get_mut(&key) {
            ids.retain(|&h| h != id);
            if ids.is_empty() {
                self.index.remove(&key);
            }
        }
        true
    }

    /// Unregister everything attached to `target`. Returns how many went.
    pub fn remove_target(&mut self, target: Target) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.target != target);
        self.index.retain(|(t, _), _| *t != target);
        before - self.entries.len()
    }

    /// Whether `id` is still registered.
    pub fn contains(&self, id: HandlerId) -> bool {
        self.entries.contains_key(id)
    }

    /// Snapshot of the handlers for `(target, kind)`, in registration order.
    pub fn handlers_for(&self, target: Target, kind: EventKind) -> Vec<(HandlerId, Handler)> {
        self.index
            .get(&(target, kind))
            .map(|ids| {
                ids.iter()
                    .filter_map(|&id| self.entries.get(id).map(|e| (id, Rc::clone(&e.handler))))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of handlers for `(target, kind)`.
    pub fn count_for(&self, target: Target, kind: EventKind) -> usize {
        self.index.get(&(target, kind)).map_or(0, Vec::len)
    }

    /// Whether `target` has any handler for `kind`.
    pub fn has_handlers(&self, target: Target, kind: EventKind) -> bool {
        self.count_for(target, kind) > 0
    }

    /// Total number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.entries.len())
            .field("lists", &self.index.len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
