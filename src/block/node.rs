//! Node types: WidgetId, Block.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use slotmap::new_key_type;

use super::border::Border;
use crate::capability::Capabilities;
use crate::color::Color;
use crate::geometry::Rect;
use crate::layout::{Layout, Sizer};
use crate::window::WindowId;

new_key_type! {
    /// Unique identifier for a block in a [`Tree`](super::Tree). Copy, lightweight (u64).
    pub struct WidgetId;
}

/// The structural state every widget carries.
///
/// A block is a rectangle with optional border, background and sizing
/// capabilities. Its parent/child links live in the [`Tree`](super::Tree),
/// not here, so that a block can never disagree with the list it sits in.
#[derive(Clone)]
pub struct Block {
    /// Widget type name (e.g. "Button", "Panel"), used in logs and debug output.
    pub widget_type: String,
    pub(crate) bounds: Rect,
    pub(crate) border: Option<Rc<dyn Border>>,
    pub(crate) background: Color,
    pub(crate) disabled: bool,
    pub(crate) focusable: bool,
    pub(crate) grab_focus_when_clicked_on: bool,
    pub(crate) need_layout: bool,
    pub(crate) layout_data: Option<Rc<dyn Any>>,
    pub(crate) sizer: Option<Rc<dyn Sizer>>,
    pub(crate) layout: Option<Rc<dyn Layout>>,
    pub(crate) capabilities: Capabilities,
    /// Set only on the root block of a window.
    pub(crate) window: Option<WindowId>,
}

impl Block {
    /// Create a detached, enabled, non-focusable block with empty bounds.
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            bounds: Rect::EMPTY,
            border: None,
            background: Color::TRANSPARENT,
            disabled: false,
            focusable: false,
            grab_focus_when_clicked_on: false,
            need_layout: false,
            layout_data: None,
            sizer: None,
            layout: None,
            capabilities: Capabilities::default(),
            window: None,
        }
    }

    /// Set the initial bounds (builder).
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the background color (builder).
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the border (builder).
    pub fn with_border(mut self, border: impl Border + 'static) -> Self {
        self.border = Some(Rc::new(border));
        self
    }

    /// Set the sizer (builder).
    pub fn with_sizer(mut self, sizer: impl Sizer + 'static) -> Self {
        self.sizer = Some(Rc::new(sizer));
        self
    }

    /// Set the layout (builder). The block starts out needing layout.
    pub fn with_layout(mut self, layout: impl Layout + 'static) -> Self {
        self.layout = Some(Rc::new(layout));
        self.need_layout = true;
        self
    }

    /// Attach a layout-data payload for the parent's layout to read (builder).
    pub fn with_layout_data<T: Any>(mut self, data: T) -> Self {
        self.layout_data = Some(Rc::new(data));
        self
    }

    /// Set optional capabilities (builder).
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set whether this block can receive keyboard focus (builder).
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Set whether a click on this block moves the focus to it (builder).
    pub fn grab_focus_when_clicked_on(mut self, grab: bool) -> Self {
        self.grab_focus_when_clicked_on = grab;
        self
    }

    /// Set whether this block is disabled (builder).
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Location and size in the parent's coordinate system.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Bounds moved to the origin.
    pub fn local_bounds(&self) -> Rect {
        self.bounds.at_origin()
    }

    /// Local bounds minus the border's insets.
    pub fn local_inset_bounds(&self) -> Rect {
        let local = self.local_bounds();
        match &self.border {
            Some(border) => local.inset(border.insets()),
            None => local,
        }
    }

    pub fn border(&self) -> Option<&Rc<dyn Border>> {
        self.border.as_ref()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn enabled(&self) -> bool {
        !self.disabled
    }

    /// Whether the block may take keyboard focus right now. Disabled blocks never can.
    pub fn is_focusable(&self) -> bool {
        self.focusable && !self.disabled
    }

    pub fn grabs_focus_when_clicked_on(&self) -> bool {
        self.grab_focus_when_clicked_on
    }

    pub fn need_layout(&self) -> bool {
        self.need_layout
    }

    pub fn layout_data(&self) -> Option<&dyn Any> {
        self.layout_data.as_deref()
    }

    /// The layout-data payload, if present and of type `T`.
    pub fn layout_data_as<T: Any>(&self) -> Option<&T> {
        self.layout_data.as_deref().and_then(|d| d.downcast_ref::<T>())
    }

    pub fn sizer(&self) -> Option<&Rc<dyn Sizer>> {
        self.sizer.as_ref()
    }

    pub fn layout(&self) -> Option<&Rc<dyn Layout>> {
        self.layout.as_ref()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Whether this block is the root of a window.
    pub fn is_root_of_window(&self) -> bool {
        self.window.is_some()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("widget_type", &self.widget_type)
            .field("bounds", &self.bounds)
            .field("background", &self.background)
            .field("disabled", &self.disabled)
            .field("focusable", &self.focusable)
            .field("need_layout", &self.need_layout)
            .field("has_border", &self.border.is_some())
            .field("has_sizer", &self.sizer.is_some())
            .field("has_layout", &self.layout.is_some())
            .field("window", &self.window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Insets;
    use crate::block::border::EmptyBorder;
    use crate::layout::FixedSizer;
    use crate::geometry::Size;

    #[test]
    fn new_defaults() {
        let block = Block::new("Panel");
        assert_eq!(block.widget_type, "Panel");
        assert_eq!(block.bounds(), Rect::EMPTY);
        assert!(block.enabled());
        assert!(!block.is_focusable());
        assert!(!block.need_layout());
        assert!(!block.is_root_of_window());
        assert!(block.layout_data().is_none());
        assert!(!block.background().is_visible());
    }

    #[test]
    fn disabled_blocks_are_not_focusable() {
        let block = Block::new("Button").focusable(true);
        assert!(block.is_focusable());
        let block = block.disabled(true);
        assert!(!block.is_focusable());
        assert!(!block.enabled());
    }

    #[test]
    fn local_inset_bounds_subtracts_border() {
        let block = Block::new("Panel")
            .with_bounds(Rect::new(30.0, 40.0, 100.0, 50.0))
            .with_border(EmptyBorder::new(Insets::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(block.local_bounds(), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(block.local_inset_bounds(), Rect::new(2.0, 1.0, 94.0, 46.0));
    }

    #[test]
    fn layout_data_downcast() {
        let block = Block::new("Label").with_layout_data(7_u32);
        assert_eq!(block.layout_data_as::<u32>(), Some(&7));
        assert_eq!(block.layout_data_as::<i64>(), None);
    }

    #[test]
    fn debug_format_names_type() {
        let block = Block::new("Label").with_sizer(FixedSizer::new(Size::new(1.0, 1.0)));
        let dbg = format!("{block:?}");
        assert!(dbg.contains("Label"));
        assert!(dbg.contains("has_sizer: true"));
    }
}
