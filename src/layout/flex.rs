//! Row/column flex layout, computed by taffy.
//!
//! A throwaway [`TaffyTree`] is built for every query: one root standing in
//! for the container, one leaf per child. Leaves carry the child's own
//! preferred size as context and report it from the measure function, with
//! the child's min/max as style constraints.

use taffy::prelude::*;

use super::sizer::{default_max_size, Hint, Sizer, Sizes};
use crate::block::{Tree, WidgetId};
use crate::error::Result;
use crate::geometry::{Insets, Rect, Size};
use crate::layout::Layout;
use crate::ui::Ui;

/// Main axis of a [`FlexLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Row,
    Column,
}

/// Per-child layout data read by [`FlexLayout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexData {
    pub grow: f32,
    pub shrink: f32,
}

impl FlexData {
    pub fn grow(grow: f32) -> Self {
        Self { grow, ..Self::default() }
    }
}

impl Default for FlexData {
    fn default() -> Self {
        Self { grow: 0.0, shrink: 1.0 }
    }
}

/// Lays children out along one axis, stretching them across the other.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexLayout {
    direction: Direction,
    gap: f32,
}

impl FlexLayout {
    pub fn row() -> Self {
        Self { direction: Direction::Row, gap: 0.0 }
    }

    pub fn column() -> Self {
        Self { direction: Direction::Column, gap: 0.0 }
    }

    /// Space between adjacent children (builder).
    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn root_style(&self, insets: Insets) -> taffy::Style {
        let gap = LengthPercentage::from_length(self.gap);
        taffy::Style {
            display: Display::Flex,
            flex_direction: match self.direction {
                Direction::Row => FlexDirection::Row,
                Direction::Column => FlexDirection::Column,
            },
            gap: taffy::geometry::Size { width: gap, height: gap },
            padding: taffy::geometry::Rect {
                left: LengthPercentage::from_length(insets.left),
                right: LengthPercentage::from_length(insets.right),
                top: LengthPercentage::from_length(insets.top),
                bottom: LengthPercentage::from_length(insets.bottom),
            },
            ..Default::default()
        }
    }

    /// Solve the flex problem for `id`'s children.
    ///
    /// `size` fixes the container's outer size; `None` on an axis lets it
    /// size to content under `available`. Returns the container size and the
    /// child rects, or `None` if taffy rejected the tree.
    fn solve(
        &self,
        tree: &Tree,
        id: WidgetId,
        size: (Option<f32>, Option<f32>),
        available: taffy::geometry::Size<AvailableSpace>,
    ) -> Option<(Size, Vec<(WidgetId, Rect)>)> {
        let insets = tree
            .get(id)
            .and_then(|b| b.border().map(|border| border.insets()))
            .unwrap_or(Insets::ZERO);
        let children = tree.children(id);

        let mut solver: TaffyTree<Size> = TaffyTree::new();
        let mut leaves = Vec::with_capacity(children.len());
        for &child in children {
            let sizes = tree.sizes(child, Hint::NONE);
            let data = tree
                .get(child)
                .and_then(|b| b.layout_data_as::<FlexData>().copied())
                .unwrap_or_default();
            let style = taffy::Style {
                flex_grow: data.grow,
                flex_shrink: data.shrink,
                min_size: dimensions(sizes.min),
                max_size: dimensions(sizes.max),
                ..Default::default()
            };
            leaves.push(solver.new_leaf_with_context(style, sizes.pref).ok()?);
        }

        let mut root_style = self.root_style(insets);
        root_style.size = taffy::geometry::Size {
            width: size.0.map_or(Dimension::AUTO, Dimension::from_length),
            height: size.1.map_or(Dimension::AUTO, Dimension::from_length),
        };
        let root = solver.new_with_children(root_style, &leaves).ok()?;
        solver
            .compute_layout_with_measure(root, available, |known, _available, _node, context, _style| {
                let pref = context.map(|s| *s).unwrap_or(Size::ZERO);
                taffy::geometry::Size {
                    width: known.width.unwrap_or(pref.width),
                    height: known.height.unwrap_or(pref.height),
                }
            })
            .ok()?;

        let outer = solver.layout(root).ok()?;
        let outer = Size::new(outer.size.width, outer.size.height);
        let mut placed = Vec::with_capacity(leaves.len());
        for (&child, &leaf) in children.iter().zip(&leaves) {
            let l = solver.layout(leaf).ok()?;
            placed.push((child, Rect::new(l.location.x, l.location.y, l.size.width, l.size.height)));
        }
        Some((outer, placed))
    }
}

fn dimensions(size: Size) -> taffy::geometry::Size<Dimension> {
    taffy::geometry::Size {
        width: Dimension::from_length(size.width),
        height: Dimension::from_length(size.height),
    }
}

fn available(hint: Option<f32>, fallback: AvailableSpace) -> AvailableSpace {
    hint.map_or(fallback, AvailableSpace::Definite)
}

impl Sizer for FlexLayout {
    fn sizes(&self, tree: &Tree, id: WidgetId, hint: Hint) -> Sizes {
        let space = |fallback| taffy::geometry::Size {
            width: available(hint.width, fallback),
            height: available(hint.height, fallback),
        };
        let pref = self
            .solve(tree, id, (None, None), space(AvailableSpace::MaxContent))
            .map(|(size, _)| size);
        let min = self
            .solve(tree, id, (None, None), space(AvailableSpace::MinContent))
            .map(|(size, _)| size);
        match (min, pref) {
            (Some(min), Some(pref)) => {
                let min = min.min(pref);
                Sizes::new(min, pref, default_max_size(pref))
            }
            _ => Sizes::fallback(),
        }
    }
}

impl Layout for FlexLayout {
    fn arrange(&self, ui: &mut Ui, id: WidgetId) -> Result<()> {
        let tree = ui.tree();
        let bounds = tree.bounds(id);
        let space = taffy::geometry::Size {
            width: AvailableSpace::Definite(bounds.width),
            height: AvailableSpace::Definite(bounds.height),
        };
        let Some((_, placed)) = self.solve(tree, id, (Some(bounds.width), Some(bounds.height)), space) else {
            tracing::warn!(?id, "flex layout could not be computed");
            return Ok(());
        };
        tracing::debug!(?id, children = placed.len(), "flex arranged");
        for (child, rect) in placed {
            ui.set_bounds(child, rect)?;
        }
        Ok(())
    }
}
