//! Borders: insets plus a draw routine.

use crate::color::Color;
use crate::draw::{Canvas, Paint};
use crate::geometry::{Insets, Rect};

/// A decoration drawn around the edge of a block.
///
/// The insets are consulted both when sizing (sizers add them to their
/// content size) and when computing a block's local inset bounds.
pub trait Border {
    /// Space the border occupies on each side.
    fn insets(&self) -> Insets;

    /// Draw the border inside `bounds`, given in the block's local coordinates.
    fn draw(&self, canvas: &mut dyn Canvas, bounds: Rect);
}

/// A border that reserves space but draws nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmptyBorder {
    insets: Insets,
}

impl EmptyBorder {
    pub fn new(insets: Insets) -> Self {
        Self { insets }
    }
}

impl Border for EmptyBorder {
    fn insets(&self) -> Insets {
        self.insets
    }

    fn draw(&self, _canvas: &mut dyn Canvas, _bounds: Rect) {}
}

/// A solid line along each edge, as thick as the inset on that side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBorder {
    color: Color,
    insets: Insets,
}

impl LineBorder {
    pub fn new(color: Color, insets: Insets) -> Self {
        Self { color, insets }
    }

    /// The same thickness on all four sides.
    pub fn uniform(color: Color, thickness: f32) -> Self {
        Self::new(color, Insets::uniform(thickness))
    }
}

impl Border for LineBorder {
    fn insets(&self) -> Insets {
        self.insets
    }

    fn draw(&self, canvas: &mut dyn Canvas, bounds: Rect) {
        let i = self.insets;
        let edges = [
            Rect::new(bounds.x, bounds.y, bounds.width, i.top),
            Rect::new(bounds.x, bounds.bottom() - i.bottom, bounds.width, i.bottom),
            Rect::new(bounds.x, bounds.y + i.top, i.left, bounds.height - i.height()),
            Rect::new(bounds.right() - i.right, bounds.y + i.top, i.right, bounds.height - i.height()),
        ];
        canvas.set_fill(Paint::Solid(self.color));
        for edge in edges {
            if !edge.is_empty() {
                canvas.fill_rect(edge);
            }
        }
    }
}
