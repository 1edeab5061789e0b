//! Core geometry types: Point, Size, Rect, Insets.
//!
//! All coordinates are `f32` logical units. A [`Rect`] is always expressed in
//! some node's coordinate space; conversion between spaces is done by the tree,
//! never stored here.

use std::fmt;
use std::ops::{Add, Neg, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D position or displacement.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point { x: -self.x, y: -self.y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D size (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow by the given insets on every side.
    #[inline]
    pub fn add_insets(self, insets: Insets) -> Size {
        Size {
            width: self.width + insets.width(),
            height: self.height + insets.height(),
        }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Size) -> Size {
        Size {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Size) -> Size {
        Size {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
        }
    }

    /// Round each dimension up to the next whole unit.
    #[inline]
    pub fn ceil(self) -> Size {
        Size { width: self.width.ceil(), height: self.height.ceil() }
    }

    /// Convert to a [`Rect`] positioned at the origin.
    #[inline]
    pub const fn to_rect(self) -> Rect {
        Rect { x: 0.0, y: 0.0, width: self.width, height: self.height }
    }
}

impl Add for Size {
    type Output = Size;
    #[inline]
    fn add(self, rhs: Size) -> Size {
        Size { width: self.width + rhs.width, height: self.height + rhs.height }
    }
}

impl Sub for Size {
    type Output = Size;
    #[inline]
    fn sub(self, rhs: Size) -> Size {
        Size { width: self.width - rhs.width, height: self.height - rhs.height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A rectangle defined by its top-left position and size.
///
/// The right and bottom edges are exclusive for point containment.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// An empty rect at the origin.
    pub const EMPTY: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    /// Create a new rect.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rect from a position and a size.
    #[inline]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self { x: origin.x, y: origin.y, width: size.width, height: size.height }
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// The top-left corner.
    #[inline]
    pub const fn origin(self) -> Point {
        Point { x: self.x, y: self.y }
    }

    /// The dimensions.
    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// The same size, moved to the origin.
    #[inline]
    pub const fn at_origin(self) -> Rect {
        Rect { x: 0.0, y: 0.0, width: self.width, height: self.height }
    }

    /// Whether the rect covers no area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `pt` lies inside this rect.
    #[inline]
    pub fn contains(self, pt: Point) -> bool {
        pt.x >= self.x && pt.x < self.right() && pt.y >= self.y && pt.y < self.bottom()
    }

    /// Whether `other` is entirely contained within this rect.
    #[inline]
    pub fn contains_rect(self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether `other` overlaps this rect (non-zero intersection area).
    #[inline]
    pub fn intersects(self, other: Rect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Compute the intersection of two rects.
    ///
    /// Returns [`Rect::EMPTY`] if they do not overlap.
    #[inline]
    pub fn intersection(self, other: Rect) -> Rect {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        let w = x2 - x1;
        let h = y2 - y1;
        if w <= 0.0 || h <= 0.0 {
            Rect::EMPTY
        } else {
            Rect { x: x1, y: y1, width: w, height: h }
        }
    }

    /// Compute the smallest rect containing both `self` and `other`.
    ///
    /// An empty operand does not contribute.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Rect { x: x1, y: y1, width: x2 - x1, height: y2 - y1 }
    }

    /// Translate the rect by a displacement.
    #[inline]
    pub fn translate(self, by: Point) -> Rect {
        Rect { x: self.x + by.x, y: self.y + by.y, width: self.width, height: self.height }
    }

    /// Contract the rect inward by the given [`Insets`].
    ///
    /// Width and height are clamped to zero.
    #[inline]
    pub fn inset(self, insets: Insets) -> Rect {
        Rect {
            x: self.x + insets.left,
            y: self.y + insets.top,
            width: (self.width - insets.width()).max(0.0),
            height: (self.height - insets.height()).max(0.0),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// Insets
// ---------------------------------------------------------------------------

/// Space reserved along the four sides of a rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Insets {
    /// Zero insets on all sides.
    pub const ZERO: Insets = Insets { top: 0.0, left: 0.0, bottom: 0.0, right: 0.0 };

    /// Create insets with explicit values for each side.
    #[inline]
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self { top, left, bottom, right }
    }

    /// All four sides set to the same value.
    #[inline]
    pub const fn uniform(value: f32) -> Self {
        Self { top: value, left: value, bottom: value, right: value }
    }

    /// Total horizontal extent: `left + right`.
    #[inline]
    pub fn width(self) -> f32 {
        self.left + self.right
    }

    /// Total vertical extent: `top + bottom`.
    #[inline]
    pub fn height(self) -> f32 {
        self.top + self.bottom
    }
}

impl Add for Insets {
    type Output = Insets;
    #[inline]
    fn add(self, rhs: Insets) -> Insets {
        Insets {
            top: self.top + rhs.top,
            left: self.left + rhs.left,
            bottom: self.bottom + rhs.bottom,
            right: self.right + rhs.right,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
