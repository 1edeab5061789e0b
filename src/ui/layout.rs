//! Bounds changes and layout validation.

use tracing::debug;

use super::Ui;
use crate::block::WidgetId;
use crate::error::{Result, TreeError};
use crate::event::{Event, EventKind};
use crate::geometry::{Point, Rect, Size};
use crate::window::WindowId;

impl Ui {
    /// Move and/or resize a widget.
    ///
    /// The old footprint is repainted before the change and the new one
    /// after. A size change marks the widget as needing layout and
    /// dispatches `Resized` to it. Equal bounds do nothing at all.
    pub fn set_bounds(&mut self, id: WidgetId, bounds: Rect) -> Result<()> {
        let old = self.tree.get(id).ok_or(TreeError::UnknownWidget(id))?.bounds;
        let moved = old.origin() != bounds.origin();
        let resized = old.size() != bounds.size();
        if !moved && !resized {
            return Ok(());
        }
        self.repaint(id);
        if let Some(block) = self.tree.get_mut(id) {
            block.bounds = bounds;
            if resized {
                block.need_layout = true;
            }
        }
        let result = if resized {
            self.dispatch(&mut Event::new(EventKind::Resized, id))
        } else {
            Ok(())
        };
        self.repaint(id);
        result
    }

    pub fn set_location(&mut self, id: WidgetId, location: Point) -> Result<()> {
        let size = self.tree.bounds(id).size();
        self.set_bounds(id, Rect::from_parts(location, size))
    }

    pub fn set_size(&mut self, id: WidgetId, size: Size) -> Result<()> {
        let location = self.tree.bounds(id).origin();
        self.set_bounds(id, Rect::from_parts(location, size))
    }

    /// Run pending layouts in the subtree under `id`, parents before
    /// children.
    ///
    /// Every descendant is visited whether or not its parent needed layout.
    pub fn validate_layout(&mut self, id: WidgetId) -> Result<()> {
        if self.tree.need_layout(id) {
            let layout = self.tree.get(id).and_then(|b| b.layout().cloned());
            if let Some(layout) = layout {
                debug!(?id, "arranging");
                layout.arrange(self, id)?;
                self.repaint(id);
            }
            self.tree.set_need_layout(id, false);
        }
        let children = self.tree.children(id).to_vec();
        for child in children {
            self.validate_layout(child)?;
        }
        Ok(())
    }

    /// Change a window's content frame; the root takes its size.
    pub fn set_content_frame(&mut self, window: WindowId, frame: Rect) -> Result<()> {
        let w = self.windows.get_mut(window).ok_or(TreeError::UnknownWindow(window))?;
        w.content_frame = frame;
        let root = w.root;
        self.set_size(root, frame.size())?;
        self.repaint_window(window);
        Ok(())
    }

    /// Size the window to its root's preferred size.
    pub fn pack(&mut self, window: WindowId) -> Result<Size> {
        let w = self.require_window(window)?;
        let (root, origin) = (w.root, w.content_frame.origin());
        let size = self.tree.preferred_size(root);
        debug!(?window, %size, "packing window");
        self.set_content_frame(window, Rect::from_parts(origin, size))?;
        Ok(size)
    }
}
