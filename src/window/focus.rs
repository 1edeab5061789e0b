//! Tab-order focus chain.

use crate::block::{Tree, WidgetId};

/// An ordered list of focusable widgets for keyboard traversal.
///
/// Built on demand from a window's tree: depth-first, in child order,
/// keeping only widgets that are focusable and enabled. Traversal wraps at
/// both ends.
#[derive(Debug, Default)]
pub struct FocusChain {
    /// Focusable widgets in tab order.
    nodes: Vec<WidgetId>,
    /// Index of the current focus holder, or `None` if it is not in the chain.
    current: Option<usize>,
}

impl FocusChain {
    /// Create a new, empty focus chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the chain for the tree under `root`, positioned at `focused`.
    pub fn build(tree: &Tree, root: WidgetId, focused: Option<WidgetId>) -> Self {
        let mut chain = Self::new();
        chain.rebuild(tree, root);
        if let Some(id) = focused {
            chain.focus_node(id);
        }
        chain
    }

    /// Recollect the chain from the tree, keeping the current node if it is
    /// still eligible.
    pub fn rebuild(&mut self, tree: &Tree, root: WidgetId) {
        let old_focused = self.current_node();
        self.nodes = tree
            .walk_depth_first(root)
            .into_iter()
            .filter(|&id| tree.is_focusable(id))
            .collect();
        self.current = old_focused.and_then(|old| self.nodes.iter().position(|&n| n == old));
    }

    /// The current node, if any.
    pub fn current_node(&self) -> Option<WidgetId> {
        self.current.and_then(|idx| self.nodes.get(idx).copied())
    }

    /// Advance to the next node, wrapping. Starts at the first node when there
    /// is no current one.
    pub fn focus_next(&mut self) -> Option<WidgetId> {
        if self.nodes.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(idx) => (idx + 1) % self.nodes.len(),
            None => 0,
        };
        self.current = Some(next);
        self.nodes.get(next).copied()
    }

    /// Step back to the previous node, wrapping. Starts at the last node when
    /// there is no current one.
    pub fn focus_previous(&mut self) -> Option<WidgetId> {
        if self.nodes.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.nodes.len() - 1,
            Some(idx) => idx - 1,
        };
        self.current = Some(prev);
        self.nodes.get(prev).copied()
    }

    /// Make `id` current. Returns `false` if it is not in the chain.
    pub fn focus_node(&mut self, id: WidgetId) -> bool {
        match self.nodes.iter().position(|&n| n == id) {
            Some(pos) => {
                self.current = Some(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn nodes(&self) -> &[WidgetId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
