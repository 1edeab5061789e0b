//! Tree operations: add, remove, reparent, hit-test, coordinate conversion.

use std::any::Any;
use std::collections::VecDeque;
use std::rc::Rc;

use slotmap::{SecondaryMap, SlotMap};

use super::border::Border;
use super::node::{Block, WidgetId};
use crate::capability::{Pager, Scrollable};
use crate::error::TreeError;
use crate::geometry::{Point, Rect, Size};
use crate::layout::{Hint, Layout, Sizer, Sizes};
use crate::window::WindowId;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[WidgetId] = &[];

/// The composition tree, backed by a slotmap arena.
///
/// All blocks live in a single `SlotMap`. Parent/child relationships are
/// stored in secondary maps, so a child's parent link and its entry in the
/// parent's child list are always updated together. Child order is paint order
/// and the default focus-traversal order.
///
/// Operations here never dispatch events and never repaint; those live on
/// [`Ui`](crate::ui::Ui), which owns a `Tree`.
pub struct Tree {
    nodes: SlotMap<WidgetId, Block>,
    children: SecondaryMap<WidgetId, Vec<WidgetId>>,
    parent: SecondaryMap<WidgetId, WidgetId>,
    detect_cycles: bool,
}

impl Tree {
    /// Create an empty tree that rejects cyclic parenting.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            detect_cycles: true,
        }
    }

    /// Turn the cycle check in [`add_child_at`](Self::add_child_at) on or off.
    pub fn set_cycle_detection(&mut self, enabled: bool) {
        self.detect_cycles = enabled;
    }

    // ── Arena ────────────────────────────────────────────────────────

    /// Insert a detached block (no parent, no window).
    pub fn insert(&mut self, block: Block) -> WidgetId {
        let id = self.nodes.insert(block);
        self.children.insert(id, Vec::new());
        id
    }

    /// Remove a block and all its descendants from the arena.
    ///
    /// Returns every removed id (the block first), or an empty vec if `id`
    /// did not exist.
    pub fn destroy(&mut self, id: WidgetId) -> Vec<WidgetId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }
        self.detach(id);

        let mut removed = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(id);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            if self.nodes.remove(current).is_some() {
                removed.push(current);
            }
        }
        removed
    }

    /// Immutable access to a block.
    pub fn get(&self, id: WidgetId) -> Option<&Block> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: WidgetId) -> Option<&mut Block> {
        self.nodes.get_mut(id)
    }

    fn require(&self, id: WidgetId) -> Result<&Block, TreeError> {
        self.nodes.get(id).ok_or(TreeError::UnknownWidget(id))
    }

    fn require_mut(&mut self, id: WidgetId) -> Result<&mut Block, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::UnknownWidget(id))
    }

    /// Whether the tree contains a block with the given id.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of blocks in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Get the parent of a block, if it has one.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a block. Returns an empty slice if the block has no
    /// children or does not exist.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Position of `child` in `parent`'s child list.
    pub fn index_of_child(&self, parent: WidgetId, child: WidgetId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Append `child` to `parent`, detaching it from any previous parent first.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), TreeError> {
        self.add_child_at(parent, child, -1)
    }

    /// Insert `child` into `parent`'s child list before the child currently at
    /// `index`.
    ///
    /// A negative or out-of-range index appends. `child` is detached from any
    /// previous parent first (which may shift indices if that parent is
    /// `parent` itself), and `parent` is marked as needing layout.
    pub fn add_child_at(
        &mut self,
        parent: WidgetId,
        child: WidgetId,
        index: isize,
    ) -> Result<(), TreeError> {
        self.require(parent)?;
        self.require(child)?;
        if self.detect_cycles && (parent == child || self.is_ancestor(child, parent)) {
            tracing::warn!(?parent, ?child, "rejected cyclic add_child");
            return Err(TreeError::Cycle { parent, child });
        }

        self.detach(child);

        let siblings = self
            .children
            .entry(parent)
            .map(|entry| entry.or_default());
        if let Some(siblings) = siblings {
            match usize::try_from(index) {
                Ok(i) if i < siblings.len() => siblings.insert(i, child),
                _ => siblings.push(child),
            }
        }
        self.parent.insert(child, parent);
        self.require_mut(parent)?.need_layout = true;
        Ok(())
    }

    /// Remove `child` from `parent`. No-op (returns `false`) if it is not a
    /// direct child.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        match self.index_of_child(parent, child) {
            Some(index) => self.remove_child_at(parent, index).is_some(),
            None => false,
        }
    }

    /// Remove the child at `index`. Out-of-range indices are a no-op.
    ///
    /// The removed child stays in the arena, detached.
    pub fn remove_child_at(&mut self, parent: WidgetId, index: usize) -> Option<WidgetId> {
        let siblings = self.children.get_mut(parent)?;
        if index >= siblings.len() {
            return None;
        }
        let child = siblings.remove(index);
        self.parent.remove(child);
        if let Some(block) = self.nodes.get_mut(parent) {
            block.need_layout = true;
        }
        Some(child)
    }

    /// Remove `id` from its parent, if any.
    pub fn remove_from_parent(&mut self, id: WidgetId) -> bool {
        match self.parent(id) {
            Some(parent) => self.remove_child(parent, id),
            None => false,
        }
    }

    fn detach(&mut self, id: WidgetId) {
        self.remove_from_parent(id);
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = id;
        while let Some(p) = self.parent(current) {
            if p == ancestor {
                return true;
            }
            current = p;
        }
        false
    }

    /// Walk from `id` up to the root, collecting ancestor ids.
    ///
    /// The returned vec does **not** include `id` itself.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent(current) {
            result.push(p);
            current = p;
        }
        result
    }

    /// The top of `id`'s parent chain (`id` itself if it has no parent).
    pub fn root_of(&self, id: WidgetId) -> WidgetId {
        self.ancestors(id).last().copied().unwrap_or(id)
    }

    /// Pre-order depth-first traversal starting from `start`, children in order.
    pub fn walk_depth_first(&self, start: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    // ── Window linkage ───────────────────────────────────────────────

    /// The window owning `id`: its own if it is a window root, otherwise the
    /// nearest window-rooted ancestor's.
    pub fn window_of(&self, id: WidgetId) -> Option<WindowId> {
        let mut current = id;
        loop {
            let block = self.nodes.get(current)?;
            if let Some(window) = block.window {
                return Some(window);
            }
            current = self.parent(current)?;
        }
    }

    /// Whether `id` is the root block of a window.
    pub fn is_root_of_window(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(Block::is_root_of_window)
    }

    pub(crate) fn set_window(&mut self, id: WidgetId, window: Option<WindowId>) -> Result<(), TreeError> {
        self.require_mut(id)?.window = window;
        Ok(())
    }

    // ── Geometry ─────────────────────────────────────────────────────

    /// Bounds in the parent's coordinate system ([`Rect::EMPTY`] for unknown ids).
    pub fn bounds(&self, id: WidgetId) -> Rect {
        self.nodes.get(id).map(Block::bounds).unwrap_or(Rect::EMPTY)
    }

    /// Bounds moved to the origin.
    pub fn local_bounds(&self, id: WidgetId) -> Rect {
        self.bounds(id).at_origin()
    }

    /// Local bounds minus border insets.
    pub fn local_inset_bounds(&self, id: WidgetId) -> Rect {
        self.nodes
            .get(id)
            .map(Block::local_inset_bounds)
            .unwrap_or(Rect::EMPTY)
    }

    /// The deepest descendant of `id` containing `pt` (given in `id`'s local
    /// coordinates). The first matching child in child order wins at each
    /// level; `id` itself is returned when no child contains the point.
    pub fn widget_at(&self, id: WidgetId, pt: Point) -> WidgetId {
        let mut current = id;
        let mut pt = pt;
        'descend: loop {
            for &child in self.children(current) {
                let bounds = self.bounds(child);
                if bounds.contains(pt) {
                    pt = pt - bounds.origin();
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Convert a point in `id`'s local space to window space.
    pub fn to_window(&self, id: WidgetId, pt: Point) -> Point {
        let mut pt = pt + self.bounds(id).origin();
        for ancestor in self.ancestors(id) {
            pt = pt + self.bounds(ancestor).origin();
        }
        pt
    }

    /// Convert a point in window space to `id`'s local space.
    pub fn from_window(&self, id: WidgetId, pt: Point) -> Point {
        let mut pt = pt - self.bounds(id).origin();
        for ancestor in self.ancestors(id) {
            pt = pt - self.bounds(ancestor).origin();
        }
        pt
    }

    /// Translate `rect`, given in `id`'s local space, into each ancestor's
    /// space in turn, clipping against every level's local bounds.
    ///
    /// Returns the window owning the top of the chain and the clipped area in
    /// window space, or `None` if the area vanished on the way up or the chain
    /// does not end at a window root.
    pub fn damage_to_window(&self, id: WidgetId, rect: Rect) -> Option<(WindowId, Rect)> {
        let mut current = id;
        let mut area = rect;
        loop {
            let block = self.nodes.get(current)?;
            area = area.intersection(block.local_bounds());
            if area.is_empty() {
                return None;
            }
            match self.parent(current) {
                Some(parent) => {
                    area = area.translate(block.bounds.origin());
                    current = parent;
                }
                None => return block.window.map(|w| (w, area)),
            }
        }
    }

    // ── Flags and capabilities ───────────────────────────────────────

    pub fn need_layout(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(Block::need_layout)
    }

    /// Mark or clear `id` as needing its children arranged. Does not propagate.
    pub fn set_need_layout(&mut self, id: WidgetId, need_layout: bool) {
        if let Some(block) = self.nodes.get_mut(id) {
            block.need_layout = need_layout;
        }
    }

    /// Replace the layout-data payload. Marks `id` as needing layout only when
    /// the payload actually changes identity.
    pub fn set_layout_data(&mut self, id: WidgetId, data: Option<Rc<dyn Any>>) {
        if let Some(block) = self.nodes.get_mut(id) {
            let same = match (&block.layout_data, &data) {
                (Some(old), Some(new)) => Rc::ptr_eq(old, new),
                (None, None) => true,
                _ => false,
            };
            if !same {
                block.layout_data = data;
                block.need_layout = true;
            }
        }
    }

    /// Replace the layout. Always marks `id` as needing layout.
    pub fn set_layout(&mut self, id: WidgetId, layout: Option<Rc<dyn Layout>>) {
        if let Some(block) = self.nodes.get_mut(id) {
            block.layout = layout;
            block.need_layout = true;
        }
    }

    pub fn set_sizer(&mut self, id: WidgetId, sizer: Option<Rc<dyn Sizer>>) {
        if let Some(block) = self.nodes.get_mut(id) {
            block.sizer = sizer;
        }
    }

    pub fn set_border(&mut self, id: WidgetId, border: Option<Rc<dyn Border>>) {
        if let Some(block) = self.nodes.get_mut(id) {
            block.border = border;
        }
    }

    pub fn set_focusable(&mut self, id: WidgetId, focusable: bool) {
        if let Some(block) = self.nodes.get_mut(id) {
            block.focusable = focusable;
        }
    }

    pub fn set_grab_focus_when_clicked_on(&mut self, id: WidgetId, grab: bool) {
        if let Some(block) = self.nodes.get_mut(id) {
            block.grab_focus_when_clicked_on = grab;
        }
    }

    /// Whether `id` can take keyboard focus (focusable and enabled).
    pub fn is_focusable(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(Block::is_focusable)
    }

    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(Block::enabled)
    }

    /// The paging capability of `id`, if it has one.
    pub fn pager(&self, id: WidgetId) -> Option<Rc<dyn Pager>> {
        self.nodes.get(id)?.capabilities.pager.clone()
    }

    /// The scrolling capability of `id`, if it has one.
    pub fn scrollable(&self, id: WidgetId) -> Option<Rc<dyn Scrollable>> {
        self.nodes.get(id)?.capabilities.scrollable.clone()
    }

    // ── Sizing ───────────────────────────────────────────────────────

    /// The minimum, preferred and maximum sizes `id` wants for `hint`.
    ///
    /// Asks the block's layout if it has one, else its sizer, else falls back
    /// to empty min/preferred sizes with a default maximum.
    pub fn sizes(&self, id: WidgetId, hint: Hint) -> Sizes {
        let Some(block) = self.nodes.get(id) else {
            return Sizes::fallback();
        };
        if let Some(layout) = &block.layout {
            return layout.sizes(self, id, hint);
        }
        if let Some(sizer) = &block.sizer {
            return sizer.sizes(self, id, hint);
        }
        Sizes::fallback()
    }

    /// Shortcut for the preferred size with no hint.
    pub fn preferred_size(&self, id: WidgetId) -> Size {
        self.sizes(id, Hint::NONE).pref
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
