//! The [`Canvas`] trait and the values it consumes.

use crate::color::Color;
use crate::geometry::{Point, Rect};

// ---------------------------------------------------------------------------
// Paint
// ---------------------------------------------------------------------------

/// A color stop in a gradient, `offset` in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// What fills and strokes are drawn with.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// One segment command of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    Close,
}

/// A sequence of path commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// A closed rectangular path.
    pub fn rect(r: Rect) -> Self {
        let mut path = Self::new();
        path.move_to(Point::new(r.x, r.y))
            .line_to(Point::new(r.right(), r.y))
            .line_to(Point::new(r.right(), r.bottom()))
            .line_to(Point::new(r.x, r.bottom()))
            .close();
        path
    }

    pub fn move_to(&mut self, pt: Point) -> &mut Self {
        self.ops.push(PathOp::MoveTo(pt));
        self
    }

    pub fn line_to(&mut self, pt: Point) -> &mut Self {
        self.ops.push(PathOp::LineTo(pt));
        self
    }

    pub fn quad_to(&mut self, control: Point, to: Point) -> &mut Self {
        self.ops.push(PathOp::QuadTo { control, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.ops.push(PathOp::Close);
        self
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// A drawing context.
///
/// `save`/`restore` bracket every change to clip, paint and origin; the tree
/// always restores what it saves, even when a paint handler fails.
pub trait Canvas {
    /// Push the current graphics state.
    fn save(&mut self);

    /// Pop the most recently saved graphics state.
    fn restore(&mut self);

    /// Move the coordinate origin by `(dx, dy)`.
    fn translate(&mut self, dx: f32, dy: f32);

    /// Intersect the clip with `rect`.
    fn clip_rect(&mut self, rect: Rect);

    /// Intersect the clip with the area enclosed by `path`.
    fn clip_path(&mut self, path: &Path);

    /// Paint used by subsequent fills.
    fn set_fill(&mut self, paint: Paint);

    /// Paint used by subsequent strokes.
    fn set_stroke(&mut self, paint: Paint);

    fn fill_rect(&mut self, rect: Rect);

    fn stroke_rect(&mut self, rect: Rect);

    fn fill_path(&mut self, path: &Path);

    fn stroke_path(&mut self, path: &Path);

    /// Draw `text` with its top-left corner at `at`. Shaping is the
    /// implementation's business.
    fn draw_text(&mut self, at: Point, text: &str);

    /// Draw the image identified by `image` scaled into `dest`.
    fn draw_image(&mut self, image: u64, dest: Rect);
}
