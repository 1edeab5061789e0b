//! The UI context: one tree, its windows, handlers and queued work.
//!
//! [`Ui`] is the single-threaded owner of everything a widget hierarchy
//! needs. Structural and geometric queries live on [`Tree`]; anything that
//! touches more than one subsystem (dispatching events, moving bounds and
//! repainting, routing input, moving focus, running tasks) is a method here.
//! Handlers receive `&mut Ui`, so they can do all of the above themselves.

mod input;
mod layout;
mod paint;
mod scroll;
mod task;

pub use task::{Task, UiHandle};

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::block::{Tree, WidgetId};
use crate::color::Color;
use crate::error::{DispatchError, HandlerError, Result, TreeError};
use crate::event::{Event, EventKind, HandlerId, HandlerRegistry, Target};
use crate::geometry::Rect;
use crate::window::{FocusChain, Surface, Window, WindowId};

use task::TaskQueue;

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Ui`].
#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Reject `add_child` calls that would make a widget its own ancestor.
    pub detect_cycles: bool,
    /// Longest parent-target chain a cascading event may walk.
    pub max_cascade_depth: usize,
    /// Line scroll step for widgets without a pager.
    pub line_scroll_amount: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_cascade_depth: 256,
            line_scroll_amount: 16.0,
        }
    }
}

impl UiConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable cycle detection (builder).
    pub fn with_detect_cycles(mut self, detect_cycles: bool) -> Self {
        self.detect_cycles = detect_cycles;
        self
    }

    /// Set the cascade depth limit (builder).
    pub fn with_max_cascade_depth(mut self, depth: usize) -> Self {
        self.max_cascade_depth = depth;
        self
    }

    /// Set the fallback line scroll step (builder).
    pub fn with_line_scroll_amount(mut self, amount: f32) -> Self {
        self.line_scroll_amount = amount;
        self
    }
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// The UI context.
pub struct Ui {
    tree: Tree,
    windows: SlotMap<WindowId, Window>,
    handlers: HandlerRegistry,
    tasks: TaskQueue,
    config: UiConfig,
    /// Handlers currently on the call stack, innermost last.
    running: Vec<HandlerId>,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    pub fn new() -> Self {
        Self::with_config(UiConfig::default())
    }

    pub fn with_config(config: UiConfig) -> Self {
        let mut tree = Tree::new();
        tree.set_cycle_detection(config.detect_cycles);
        Self {
            tree,
            windows: SlotMap::with_key(),
            handlers: HandlerRegistry::new(),
            tasks: TaskQueue::new(),
            config,
            running: Vec::new(),
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// The widget tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access to the tree for structural edits.
    ///
    /// Tree edits mark layout as needed but never repaint or dispatch.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    // ── Windows ──────────────────────────────────────────────────────

    /// Make `root` the root block of a new window with the given content
    /// frame.
    ///
    /// The root is detached from any parent and sized to the frame. If it
    /// already roots a window, that window is returned unchanged.
    pub fn open_window(&mut self, root: WidgetId, frame: Rect) -> Result<WindowId, TreeError> {
        let block = self.tree.get(root).ok_or(TreeError::UnknownWidget(root))?;
        if let Some(existing) = block.window {
            return Ok(existing);
        }
        self.tree.remove_from_parent(root);
        let id = self.windows.insert(Window::new(root, frame));
        self.tree.set_window(root, Some(id))?;
        if let Some(block) = self.tree.get_mut(root) {
            block.bounds = frame.at_origin();
            block.need_layout = true;
        }
        if let Some(window) = self.windows.get_mut(id) {
            window.add_dirty(frame.at_origin());
        }
        debug!(?id, ?root, %frame, "window opened");
        Ok(id)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub(crate) fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    fn require_window(&self, id: WindowId) -> Result<&Window, TreeError> {
        self.windows.get(id).ok_or(TreeError::UnknownWindow(id))
    }

    /// `slot` if that widget still lives in `window`. Widgets detached or
    /// moved through the tree leave stale focus/hover/pressed entries.
    fn in_window(&self, window: WindowId, slot: Option<WidgetId>) -> Option<WidgetId> {
        slot.filter(|&id| self.tree.window_of(id) == Some(window))
    }

    /// All open windows.
    pub fn windows(&self) -> impl Iterator<Item = (WindowId, &Window)> + '_ {
        self.windows.iter()
    }

    /// Whether `id` refers to an open window.
    pub fn is_window_valid(&self, id: WindowId) -> bool {
        self.windows.contains_key(id)
    }

    /// Attach the platform side of a window. Pending paint is re-announced.
    pub fn set_surface(&mut self, id: WindowId, surface: impl Surface + 'static) -> Result<(), TreeError> {
        let window = self.windows.get_mut(id).ok_or(TreeError::UnknownWindow(id))?;
        let mut surface: Box<dyn Surface> = Box::new(surface);
        surface.set_title(&window.title);
        if window.needs_paint() {
            surface.request_paint(window.dirty);
        }
        window.surface = Some(surface);
        Ok(())
    }

    pub fn title(&self, id: WindowId) -> Option<&str> {
        self.windows.get(id).map(Window::title)
    }

    pub fn set_title(&mut self, id: WindowId, title: impl Into<String>) -> Result<(), TreeError> {
        let window = self.windows.get_mut(id).ok_or(TreeError::UnknownWindow(id))?;
        window.title = title.into();
        if let Some(surface) = window.surface.as_mut() {
            surface.set_title(&window.title);
        }
        Ok(())
    }

    /// Ask the window to close. Dispatches `Closing`; a handler vetoes by
    /// finishing the event. Returns whether the window closed.
    pub fn attempt_close(&mut self, id: WindowId) -> Result<bool> {
        self.require_window(id)?;
        let mut closing = Event::new(EventKind::Closing, id);
        self.dispatch(&mut closing)?;
        if closing.finished() {
            debug!(?id, "window close vetoed");
            return Ok(false);
        }
        self.close(id)?;
        Ok(true)
    }

    /// Close the window unconditionally.
    ///
    /// Dispatches `Closed`, releases the surface and drops the window. The
    /// root block stays in the tree, no longer window-rooted.
    pub fn close(&mut self, id: WindowId) -> Result<()> {
        self.require_window(id)?;
        let result = self.dispatch(&mut Event::new(EventKind::Closed, id));
        if let Some(mut window) = self.windows.remove(id) {
            if let Some(surface) = window.surface.as_mut() {
                surface.close();
            }
            if let Some(block) = self.tree.get_mut(window.root) {
                block.window = None;
            }
        }
        self.handlers.remove_target(Target::Window(id));
        debug!(?id, "window closed");
        result
    }

    // ── Handlers ─────────────────────────────────────────────────────

    /// Register `handler` for events of `kind` sent to `target`. Handlers for
    /// the same pair run in registration order.
    pub fn add_handler<F>(&mut self, target: impl Into<Target>, kind: EventKind, handler: F) -> HandlerId
    where
        F: Fn(&mut Ui, &mut Event<'_>) -> std::result::Result<(), HandlerError> + 'static,
    {
        self.handlers.add(target.into(), kind, std::rc::Rc::new(handler))
    }

    /// Unregister a handler. Returns `false` if it was already gone.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.handlers.remove(id)
    }

    /// The next target a cascading event visits after `target`.
    ///
    /// A widget's parent target is its parent widget, or its window if it is
    /// a window root. Windows cascade to the application.
    pub fn parent_target(&self, target: Target) -> Option<Target> {
        match target {
            Target::Widget(id) => match self.tree.parent(id) {
                Some(parent) => Some(Target::Widget(parent)),
                None => self.tree.get(id).and_then(|b| b.window).map(Target::Window),
            },
            Target::Window(_) => Some(Target::App),
            Target::App => None,
        }
    }

    /// Deliver `event` to its target's handlers, then up the parent-target
    /// chain while it cascades and is not finished.
    ///
    /// The handler list for each target is snapshotted before the first
    /// handler runs; handlers removed mid-dispatch are skipped. A handler
    /// error stops dispatch and propagates.
    pub fn dispatch(&mut self, event: &mut Event<'_>) -> Result<()> {
        let kind = event.kind();
        let mut current = Some(event.target());
        let mut depth = 0;
        while let Some(target) = current {
            if depth > self.config.max_cascade_depth {
                warn!(%kind, depth, "cascade depth limit reached");
                return Err(DispatchError::CascadeTooDeep(self.config.max_cascade_depth));
            }
            for (id, handler) in self.handlers.handlers_for(target, kind) {
                if !self.handlers.contains(id) {
                    continue;
                }
                if self.running.contains(&id) {
                    warn!(%kind, ?target, ?id, "handler re-entered");
                }
                trace!(%kind, ?target, ?id, "invoking handler");
                self.running.push(id);
                let outcome = handler(self, event);
                self.running.pop();
                outcome.map_err(|source| DispatchError::Handler { kind, source })?;
                if event.finished() {
                    return Ok(());
                }
            }
            if event.finished() || !event.cascades() {
                return Ok(());
            }
            current = self.parent_target(target);
            if let Some(next) = current {
                trace!(%kind, from = ?target, to = ?next, "cascading");
            }
            depth += 1;
        }
        Ok(())
    }

    // ── Widget state ─────────────────────────────────────────────────

    /// Remove `id` and its subtree, with every handler registered on them.
    ///
    /// A window root closes its window first. Focus, hover and pointer
    /// capture pointing into the subtree are cleared.
    pub fn destroy_widget(&mut self, id: WidgetId) -> Result<()> {
        let rooted = self.tree.get(id).ok_or(TreeError::UnknownWidget(id))?.window;
        match rooted {
            Some(window) => self.close(window)?,
            None => self.repaint(id),
        }
        let removed = self.tree.destroy(id);
        for window in self.windows.values_mut() {
            for slot in [&mut window.focus, &mut window.hover, &mut window.pressed] {
                if slot.is_some_and(|w| removed.contains(&w)) {
                    *slot = None;
                }
            }
        }
        let handlers: usize = removed
            .iter()
            .map(|&w| self.handlers.remove_target(Target::Widget(w)))
            .sum();
        debug!(?id, widgets = removed.len(), handlers, "widget destroyed");
        Ok(())
    }

    /// Enable or disable a widget. Repaints when the state changes.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        let Some(block) = self.tree.get_mut(id) else {
            return;
        };
        if block.disabled == !enabled {
            return;
        }
        block.disabled = !enabled;
        self.repaint(id);
    }

    pub fn set_background(&mut self, id: WidgetId, color: Color) {
        let Some(block) = self.tree.get_mut(id) else {
            return;
        };
        if block.background == color {
            return;
        }
        block.background = color;
        self.repaint(id);
    }

    pub fn set_focusable(&mut self, id: WidgetId, focusable: bool) {
        self.tree.set_focusable(id, focusable);
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// The focus holder of `window`, if it is still part of the window.
    pub fn focus(&self, window: WindowId) -> Option<WidgetId> {
        self.in_window(window, self.windows.get(window).and_then(Window::focus))
    }

    /// Whether `id` is its window's focus holder.
    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.tree
            .window_of(id)
            .and_then(|w| self.windows.get(w))
            .is_some_and(|w| w.is_focused(id))
    }

    /// Move the focus of `window` to `target`, or clear it.
    ///
    /// The old holder gets `FocusLost`, the new one `FocusGained`, and both
    /// repaint. The target must belong to the window.
    pub fn set_focus(&mut self, window: WindowId, target: Option<WidgetId>) -> Result<()> {
        let old = self.in_window(window, self.require_window(window)?.focus);
        if old == target {
            if let Some(w) = self.windows.get_mut(window) {
                w.focus = target;
            }
            return Ok(());
        }
        if let Some(id) = target {
            if self.tree.window_of(id) != Some(window) {
                return Err(TreeError::UnknownWidget(id).into());
            }
        }
        if let Some(w) = self.windows.get_mut(window) {
            w.focus = target;
        }
        debug!(?window, from = ?old, to = ?target, "focus changed");
        if let Some(old) = old.filter(|&id| self.tree.contains(id)) {
            self.repaint(old);
            self.dispatch(&mut Event::new(EventKind::FocusLost, old))?;
        }
        if let Some(new) = target {
            self.repaint(new);
            self.dispatch(&mut Event::new(EventKind::FocusGained, new))?;
        }
        Ok(())
    }

    /// Move focus to the next focusable widget in tab order, wrapping.
    pub fn focus_next(&mut self, window: WindowId) -> Result<Option<WidgetId>> {
        let root = self.require_window(window)?.root;
        let mut chain = FocusChain::build(&self.tree, root, self.focus(window));
        let next = chain.focus_next();
        if next.is_some() {
            self.set_focus(window, next)?;
        }
        Ok(next)
    }

    /// Move focus to the previous focusable widget in tab order, wrapping.
    pub fn focus_previous(&mut self, window: WindowId) -> Result<Option<WidgetId>> {
        let root = self.require_window(window)?.root;
        let mut chain = FocusChain::build(&self.tree, root, self.focus(window));
        let previous = chain.focus_previous();
        if previous.is_some() {
            self.set_focus(window, previous)?;
        }
        Ok(previous)
    }
}

impl std::fmt::Debug for Ui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("widgets", &self.tree.len())
            .field("windows", &self.windows.len())
            .field("handlers", &self.handlers)
            .field("config", &self.config)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
