//! Window shell: the state a window keeps on behalf of its tree.
//!
//! A [`Window`] owns no widgets. It records which block is its root, who holds
//! the keyboard focus, and the area waiting to be painted, and it forwards
//! paint requests to an optional platform [`Surface`]. Operations that touch
//! both the window and the tree live on [`Ui`](crate::ui::Ui).

pub mod focus;

pub use focus::FocusChain;

use std::fmt;

use slotmap::new_key_type;

use crate::block::WidgetId;
use crate::geometry::Rect;

new_key_type! {
    /// Unique identifier for a window in a [`Ui`](crate::ui::Ui).
    pub struct WindowId;
}

/// The platform side of a window.
pub trait Surface {
    /// Ask the platform to schedule a paint of `area` (window coordinates).
    fn request_paint(&mut self, area: Rect);

    /// The window title changed.
    fn set_title(&mut self, _title: &str) {}

    /// The window closed; release platform resources.
    fn close(&mut self) {}
}

/// Per-window state.
pub struct Window {
    pub(crate) root: WidgetId,
    pub(crate) title: String,
    /// Bounds of the content area in display coordinates.
    pub(crate) content_frame: Rect,
    pub(crate) focus: Option<WidgetId>,
    /// Union of all areas waiting to be painted, in window coordinates.
    pub(crate) dirty: Rect,
    pub(crate) active: bool,
    /// Widget under the pointer, for entered/exited tracking.
    pub(crate) hover: Option<WidgetId>,
    /// Widget that received the last mouse down, until the matching up.
    pub(crate) pressed: Option<WidgetId>,
    pub(crate) surface: Option<Box<dyn Surface>>,
}

impl Window {
    pub(crate) fn new(root: WidgetId, content_frame: Rect) -> Self {
        Self {
            root,
            title: String::new(),
            content_frame,
            focus: None,
            dirty: Rect::EMPTY,
            active: false,
            hover: None,
            pressed: None,
            surface: None,
        }
    }

    /// The root block.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Bounds of the content area in display coordinates.
    pub fn content_frame(&self) -> Rect {
        self.content_frame
    }

    /// Bounds of the content area in its own coordinates.
    pub fn content_local_frame(&self) -> Rect {
        self.content_frame.at_origin()
    }

    /// The current keyboard focus holder.
    pub fn focus(&self) -> Option<WidgetId> {
        self.focus
    }

    /// Whether `id` holds the keyboard focus here.
    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.focus == Some(id)
    }

    /// Whether this is the active window.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The area waiting to be painted.
    pub fn pending_paint(&self) -> Rect {
        self.dirty
    }

    pub fn needs_paint(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Add `area` to the pending paint area and tell the surface.
    ///
    /// Areas outside the content are dropped.
    pub(crate) fn add_dirty(&mut self, area: Rect) {
        let area = area.intersection(self.content_local_frame());
        if area.is_empty() {
            return;
        }
        self.dirty = self.dirty.union(area);
        if let Some(surface) = self.surface.as_mut() {
            surface.request_paint(area);
        }
    }

    pub(crate) fn take_dirty(&mut self) -> Rect {
        std::mem::replace(&mut self.dirty, Rect::EMPTY)
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("root", &self.root)
            .field("title", &self.title)
            .field("content_frame", &self.content_frame)
            .field("focus", &self.focus)
            .field("dirty", &self.dirty)
            .field("active", &self.active)
            .field("has_surface", &self.surface.is_some())
            .finish()
    }
}
