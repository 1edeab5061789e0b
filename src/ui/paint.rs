//! Damage tracking and painting.

use tracing::debug;

use super::Ui;
use crate::block::WidgetId;
use crate::draw::{Canvas, Paint};
use crate::error::{Result, TreeError};
use crate::event::Event;
use crate::geometry::{Point, Rect};
use crate::window::WindowId;

impl Ui {
    /// Schedule a repaint of the whole widget.
    pub fn repaint(&mut self, id: WidgetId) {
        let local = self.tree.local_bounds(id);
        self.repaint_bounds(id, local);
    }

    /// Schedule a repaint of `area`, given in `id`'s local coordinates.
    ///
    /// The area is clipped at every level on its way up. Nothing reaches the
    /// window when it misses the widget or the widget is not in a window.
    pub fn repaint_bounds(&mut self, id: WidgetId, area: Rect) {
        if let Some((window, area)) = self.tree.damage_to_window(id, area) {
            if let Some(window) = self.windows.get_mut(window) {
                window.add_dirty(area);
            }
        }
    }

    /// Schedule a repaint of the window's whole content area.
    pub fn repaint_window(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(id) {
            let frame = window.content_local_frame();
            window.add_dirty(frame);
        }
    }

    /// Paint `id` and its descendants onto `canvas`, limited to `dirty`
    /// (local coordinates). The canvas origin must be at `id`'s origin.
    ///
    /// Children paint in child order after their parent, each with the
    /// origin moved to its own position.
    pub fn paint(&mut self, id: WidgetId, canvas: &mut dyn Canvas, dirty: Rect) -> Result<()> {
        let dirty = dirty.intersection(self.tree.local_bounds(id));
        if dirty.is_empty() {
            return Ok(());
        }
        self.paint_self(id, canvas, dirty)?;

        let children = self.tree.children(id).to_vec();
        for child in children {
            let bounds = self.tree.bounds(child);
            let adjusted = dirty.intersection(bounds);
            if adjusted.is_empty() {
                continue;
            }
            canvas.save();
            canvas.translate(bounds.x, bounds.y);
            let result = self.paint(child, canvas, adjusted.translate(Point::new(-bounds.x, -bounds.y)));
            canvas.restore();
            result?;
        }
        Ok(())
    }

    /// Background, border, then the `Paint` event for foreground content.
    fn paint_self(&mut self, id: WidgetId, canvas: &mut dyn Canvas, dirty: Rect) -> Result<()> {
        let Some(block) = self.tree.get(id) else {
            return Ok(());
        };
        let background = block.background();
        let border = block.border().cloned();
        let local = block.local_bounds();

        canvas.save();
        canvas.clip_rect(dirty);
        if background.is_visible() {
            canvas.set_fill(Paint::Solid(background));
            canvas.fill_rect(dirty);
        }
        if let Some(border) = border {
            canvas.save();
            border.draw(canvas, local);
            canvas.restore();
        }
        let result = self.dispatch(&mut Event::paint(id, &mut *canvas, dirty));
        canvas.restore();
        result
    }

    /// Bring the window up to date on `canvas`: validate layout from the
    /// root down, then paint whatever is pending.
    ///
    /// Returns the area painted, empty if there was nothing to do.
    pub fn flush_painting(&mut self, id: WindowId, canvas: &mut dyn Canvas) -> Result<Rect> {
        let root = self.require_window(id)?.root;
        self.validate_layout(root)?;
        let dirty = self
            .windows
            .get_mut(id)
            .ok_or(TreeError::UnknownWindow(id))?
            .take_dirty();
        if dirty.is_empty() {
            return Ok(dirty);
        }
        debug!(window = ?id, %dirty, "flushing paint");
        self.paint(root, canvas, dirty)?;
        Ok(dirty)
    }
}
