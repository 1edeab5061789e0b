//! Optional per-widget capabilities, queried explicitly.
//!
//! A block carries a [`Capabilities`] value with one typed slot per optional
//! capability. Code that wants one asks the tree
//! ([`Tree::pager`], [`Tree::scrollable`]) and gets `None` when it is absent,
//! in which case [`Ui`](crate::ui::Ui) applies the documented fallback.

use std::fmt;
use std::rc::Rc;

use crate::block::{Tree, WidgetId};
use crate::error::Result;
use crate::geometry::Point;
use crate::ui::Ui;

/// Custom scroll step sizes.
pub trait Pager {
    /// Distance of one line step.
    fn line_scroll_amount(&self, tree: &Tree, id: WidgetId, horizontal: bool, towards_start: bool) -> f32;

    /// Distance of one page step.
    fn page_scroll_amount(&self, tree: &Tree, id: WidgetId, horizontal: bool, towards_start: bool) -> f32;
}

/// Something with a scrollable viewport.
pub trait Scrollable {
    /// Current offset of the viewport into the content.
    fn scrolled_position(&self, tree: &Tree, id: WidgetId, horizontal: bool) -> f32;

    /// Move the viewport. Callers clamp `position` to the scrollable range.
    fn set_scrolled_position(&self, ui: &mut Ui, id: WidgetId, horizontal: bool, position: f32) -> Result<()>;

    /// Extent of the viewport.
    fn visible_size(&self, tree: &Tree, id: WidgetId, horizontal: bool) -> f32;

    /// Extent of the content behind the viewport.
    fn content_size(&self, tree: &Tree, id: WidgetId, horizontal: bool) -> f32;
}

/// Optional capability slots of a block.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub pager: Option<Rc<dyn Pager>>,
    pub scrollable: Option<Rc<dyn Scrollable>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pager(mut self, pager: impl Pager + 'static) -> Self {
        self.pager = Some(Rc::new(pager));
        self
    }

    pub fn with_scrollable(mut self, scrollable: impl Scrollable + 'static) -> Self {
        self.scrollable = Some(Rc::new(scrollable));
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("pager", &self.pager.is_some())
            .field("scrollable", &self.scrollable.is_some())
            .finish()
    }
}

/// Constant step sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPager {
    pub line: f32,
    pub page: f32,
}

impl Pager for FixedPager {
    fn line_scroll_amount(&self, _tree: &Tree, _id: WidgetId, _horizontal: bool, _towards_start: bool) -> f32 {
        self.line
    }

    fn page_scroll_amount(&self, _tree: &Tree, _id: WidgetId, _horizontal: bool, _towards_start: bool) -> f32 {
        self.page
    }
}

/// Scrolls a viewport block by moving its first child.
///
/// The viewport is the block itself; the content is its first child, whose
/// location is the negated scroll position.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildScroller;

impl ChildScroller {
    fn content(tree: &Tree, id: WidgetId) -> Option<WidgetId> {
        tree.children(id).first().copied()
    }
}

fn axis(pt: Point, horizontal: bool) -> f32 {
    if horizontal {
        pt.x
    } else {
        pt.y
    }
}

impl Scrollable for ChildScroller {
    fn scrolled_position(&self, tree: &Tree, id: WidgetId, horizontal: bool) -> f32 {
        Self::content(tree, id).map_or(0.0, |c| -axis(tree.bounds(c).origin(), horizontal))
    }

    fn set_scrolled_position(&self, ui: &mut Ui, id: WidgetId, horizontal: bool, position: f32) -> Result<()> {
        let Some(content) = Self::content(ui.tree(), id) else {
            return Ok(());
        };
        let mut location = ui.tree().bounds(content).origin();
        if horizontal {
            location.x = -position;
        } else {
            location.y = -position;
        }
        ui.set_location(content, location)
    }

    fn visible_size(&self, tree: &Tree, id: WidgetId, horizontal: bool) -> f32 {
        let size = tree.bounds(id).size();
        if horizontal {
            size.width
        } else {
            size.height
        }
    }

    fn content_size(&self, tree: &Tree, id: WidgetId, horizontal: bool) -> f32 {
        Self::content(tree, id).map_or(0.0, |c| {
            let size = tree.bounds(c).size();
            if horizontal {
                size.width
            } else {
                size.height
            }
        })
    }
}
