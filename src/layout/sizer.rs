//! The size negotiation protocol: hints, sizes, `Sizer` and `Layout`.

use crate::block::{Tree, WidgetId};
use crate::error::Result;
use crate::geometry::{Insets, Size};
use crate::ui::Ui;

/// The maximum extent a widget reports on an axis it does not limit.
pub const DEFAULT_MAX: f32 = 10_000.0;

/// `size` grown to at least [`DEFAULT_MAX`] on each axis.
pub fn default_max_size(size: Size) -> Size {
    size.max(Size::new(DEFAULT_MAX, DEFAULT_MAX))
}

// ---------------------------------------------------------------------------
// Hint
// ---------------------------------------------------------------------------

/// Optional width and height constraints passed to [`Sizer::sizes`].
///
/// `None` on an axis means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hint {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl Hint {
    /// No constraint on either axis.
    pub const NONE: Hint = Hint { width: None, height: None };

    pub const fn width(width: f32) -> Self {
        Self { width: Some(width), height: None }
    }

    pub const fn height(height: f32) -> Self {
        Self { width: None, height: Some(height) }
    }

    /// Both axes constrained to `size`.
    pub const fn exact(size: Size) -> Self {
        Self { width: Some(size.width), height: Some(size.height) }
    }

    pub fn is_none(self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// The hint with `insets` taken away from each constrained axis, never
    /// below zero. Used to turn an outer hint into one for content.
    pub fn shrink(self, insets: Insets) -> Hint {
        Hint {
            width: self.width.map(|w| (w - insets.width()).max(0.0)),
            height: self.height.map(|h| (h - insets.height()).max(0.0)),
        }
    }

    /// `size` with each constrained axis clipped to the hint.
    pub fn constrain(self, size: Size) -> Size {
        Size::new(
            self.width.map_or(size.width, |w| size.width.min(w)),
            self.height.map_or(size.height, |h| size.height.min(h)),
        )
    }
}

// ---------------------------------------------------------------------------
// Sizes
// ---------------------------------------------------------------------------

/// Minimum, preferred and maximum sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizes {
    pub min: Size,
    pub pref: Size,
    pub max: Size,
}

impl Sizes {
    pub const fn new(min: Size, pref: Size, max: Size) -> Self {
        Self { min, pref, max }
    }

    /// What a widget with neither layout nor sizer wants: nothing, up to the default max.
    pub fn fallback() -> Self {
        Self::new(Size::ZERO, Size::ZERO, default_max_size(Size::ZERO))
    }

    /// Rigid at `size` for min and preferred, default max beyond it.
    pub fn fixed(size: Size) -> Self {
        Self::new(size, size, default_max_size(size))
    }

    /// All three sizes grown by `insets`.
    pub fn add_insets(self, insets: Insets) -> Self {
        Self::new(
            self.min.add_insets(insets),
            self.pref.add_insets(insets),
            self.max.add_insets(insets),
        )
    }

    /// Whether `min <= pref <= max` holds on both axes.
    pub fn is_ordered(&self) -> bool {
        self.min.width <= self.pref.width
            && self.pref.width <= self.max.width
            && self.min.height <= self.pref.height
            && self.pref.height <= self.max.height
    }
}

impl Default for Sizes {
    fn default() -> Self {
        Self::fallback()
    }
}

// ---------------------------------------------------------------------------
// Sizer / Layout
// ---------------------------------------------------------------------------

/// Reports the sizes a widget wants.
///
/// Implementations read the tree but never change it. With an unconstrained
/// hint the result must satisfy `min <= pref <= max`; on a constrained axis
/// the preferred size must respect the hint.
pub trait Sizer {
    fn sizes(&self, tree: &Tree, id: WidgetId, hint: Hint) -> Sizes;
}

/// A container's sizing plus the arrangement of its children.
///
/// [`arrange`](Layout::arrange) is the only place child bounds are assigned
/// for a laid-out container. It must be idempotent: running it twice with
/// the same children, bounds and layout data gives the same child bounds.
pub trait Layout: Sizer {
    fn arrange(&self, ui: &mut Ui, id: WidgetId) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FixedSizer
// ---------------------------------------------------------------------------

/// A sizer with constant content sizes, plus the block's border insets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSizer {
    min: Size,
    pref: Size,
    max: Option<Size>,
}

impl FixedSizer {
    /// Minimum and preferred content size `size`; the default max.
    pub fn new(size: Size) -> Self {
        Self { min: size, pref: size, max: None }
    }

    pub fn with_min(mut self, min: Size) -> Self {
        self.min = min;
        self
    }

    pub fn with_max(mut self, max: Size) -> Self {
        self.max = Some(max);
        self
    }
}

impl Sizer for FixedSizer {
    fn sizes(&self, tree: &Tree, id: WidgetId, hint: Hint) -> Sizes {
        let insets = tree
            .get(id)
            .and_then(|b| b.border().map(|border| border.insets()))
            .unwrap_or(Insets::ZERO);
        let content_hint = hint.shrink(insets);
        let pref = content_hint.constrain(self.pref).max(self.min);
        let max = self.max.unwrap_or_else(|| default_max_size(pref)).max(pref);
        Sizes::new(self.min, pref, max).add_insets(insets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, EmptyBorder};
    use pretty_assertions::assert_eq;

    #[test]
    fn default_max_never_shrinks() {
        assert_eq!(default_max_size(Size::new(5.0, 20_000.0)), Size::new(DEFAULT_MAX, 20_000.0));
    }

    #[test]
    fn hint_constrain_and_shrink() {
        let hint = Hint::width(30.0);
        assert_eq!(hint.constrain(Size::new(50.0, 50.0)), Size::new(30.0, 50.0));
        assert_eq!(hint.shrink(Insets::uniform(20.0)).width, Some(0.0));
        assert!(Hint::NONE.is_none());
        assert!(!Hint::exact(Size::ZERO).is_none());
    }

    #[test]
    fn fallback_is_ordered() {
        assert!(Sizes::fallback().is_ordered());
        assert!(Sizes::fixed(Size::new(3.0, 4.0)).is_ordered());
    }

    #[test]
    fn fixed_sizer_adds_border_insets() {
        let mut tree = Tree::new();
        let id = tree.insert(
            Block::new("Label")
                .with_border(EmptyBorder::new(Insets::uniform(2.0)))
                .with_sizer(FixedSizer::new(Size::new(10.0, 6.0))),
        );
        let sizes = tree.sizes(id, Hint::NONE);
        assert_eq!(sizes.min, Size::new(14.0, 10.0));
        assert_eq!(sizes.pref, Size::new(14.0, 10.0));
        assert!(sizes.is_ordered());
    }

    #[test]
    fn fixed_sizer_respects_hint() {
        let mut tree = Tree::new();
        let id = tree.insert(
            Block::new("Label").with_sizer(FixedSizer::new(Size::new(80.0, 6.0)).with_min(Size::new(20.0, 6.0))),
        );
        assert_eq!(tree.sizes(id, Hint::width(50.0)).pref, Size::new(50.0, 6.0));
        // Never below the minimum.
        assert_eq!(tree.sizes(id, Hint::width(5.0)).pref, Size::new(20.0, 6.0));
    }
}
