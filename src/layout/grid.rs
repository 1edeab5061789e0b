//! Column grid layout.
//!
//! Children fill the grid row by row in child order. Per-child placement
//! comes from an optional [`GridData`] layout-data payload.

use super::sizer::{default_max_size, Hint, Layout, Sizer, Sizes};
use crate::block::{Tree, WidgetId};
use crate::error::Result;
use crate::geometry::{Insets, Rect, Size};
use crate::ui::Ui;

/// Placement of a child inside its cell, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Start,
    Middle,
    End,
    #[default]
    Fill,
}

impl Alignment {
    /// Offset and extent of something wanting `pref` inside `available`.
    fn place(self, available: f32, pref: f32) -> (f32, f32) {
        let extent = pref.min(available);
        match self {
            Alignment::Start => (0.0, extent),
            Alignment::Middle => ((available - extent) / 2.0, extent),
            Alignment::End => (available - extent, extent),
            Alignment::Fill => (0.0, available),
        }
    }
}

/// Per-child layout data read by [`GridLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridData {
    pub h_align: Alignment,
    pub v_align: Alignment,
    /// The child's column takes a share of any extra width.
    pub h_grab: bool,
    /// The child's row takes a share of any extra height.
    pub v_grab: bool,
}

impl GridData {
    pub fn new(h_align: Alignment, v_align: Alignment) -> Self {
        Self { h_align, v_align, h_grab: false, v_grab: false }
    }

    pub fn grab(mut self, horizontal: bool, vertical: bool) -> Self {
        self.h_grab = horizontal;
        self.v_grab = vertical;
        self
    }
}

/// Span of one column or row while distributing space.
#[derive(Debug, Clone, Copy, Default)]
struct Track {
    min: f32,
    pref: f32,
    grab: bool,
}

/// A grid of a fixed number of columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    columns: usize,
    equal_columns: bool,
    h_spacing: f32,
    v_spacing: f32,
}

impl GridLayout {
    /// `columns` columns (at least one), no spacing.
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            equal_columns: false,
            h_spacing: 0.0,
            v_spacing: 0.0,
        }
    }

    /// Force every column to the same width (builder).
    pub fn equal_columns(mut self, equal: bool) -> Self {
        self.equal_columns = equal;
        self
    }

    /// Space between columns and between rows (builder).
    pub fn spacing(mut self, horizontal: f32, vertical: f32) -> Self {
        self.h_spacing = horizontal;
        self.v_spacing = vertical;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn tracks(&self, tree: &Tree, children: &[WidgetId]) -> (Vec<Track>, Vec<Track>) {
        let rows = children.len().div_ceil(self.columns);
        let mut cols = vec![Track::default(); self.columns];
        let mut rows = vec![Track::default(); rows];
        for (i, &child) in children.iter().enumerate() {
            let sizes = tree.sizes(child, Hint::NONE);
            let data = grid_data(tree, child);
            let col = &mut cols[i % self.columns];
            col.min = col.min.max(sizes.min.width);
            col.pref = col.pref.max(sizes.pref.width);
            col.grab |= data.h_grab;
            let row = &mut rows[i / self.columns];
            row.min = row.min.max(sizes.min.height);
            row.pref = row.pref.max(sizes.pref.height);
            row.grab |= data.v_grab;
        }
        if self.equal_columns {
            let widest = cols.iter().fold(Track::default(), |acc, c| Track {
                min: acc.min.max(c.min),
                pref: acc.pref.max(c.pref),
                grab: acc.grab || c.grab,
            });
            cols.fill(widest);
        }
        (cols, rows)
    }

    fn insets(tree: &Tree, id: WidgetId) -> Insets {
        tree.get(id)
            .and_then(|b| b.border().map(|border| border.insets()))
            .unwrap_or(Insets::ZERO)
    }
}

fn grid_data(tree: &Tree, id: WidgetId) -> GridData {
    tree.get(id)
        .and_then(|b| b.layout_data_as::<GridData>().copied())
        .unwrap_or_default()
}

fn spacing_total(spacing: f32, count: usize) -> f32 {
    spacing * count.saturating_sub(1) as f32
}

/// Fit tracks into `available`: extra space goes evenly to grabbing tracks,
/// a deficit is taken from each track in proportion to its room above min.
fn distribute(tracks: &[Track], available: f32) -> Vec<f32> {
    let mut sizes: Vec<f32> = tracks.iter().map(|t| t.pref).collect();
    let extra = available - sizes.iter().sum::<f32>();
    if extra > 0.0 {
        let grabbing = tracks.iter().filter(|t| t.grab).count();
        if grabbing > 0 {
            let share = extra / grabbing as f32;
            for (size, track) in sizes.iter_mut().zip(tracks) {
                if track.grab {
                    *size += share;
                }
            }
        }
    } else if extra < 0.0 {
        let room: f32 = tracks.iter().map(|t| (t.pref - t.min).max(0.0)).sum();
        if room > 0.0 {
            let deficit = (-extra).min(room);
            for (size, track) in sizes.iter_mut().zip(tracks) {
                let own = (track.pref - track.min).max(0.0);
                *size = (*size - deficit * own / room).max(track.min);
            }
        }
    }
    sizes
}

impl Sizer for GridLayout {
    fn sizes(&self, tree: &Tree, id: WidgetId, hint: Hint) -> Sizes {
        let insets = Self::insets(tree, id);
        let (cols, rows) = self.tracks(tree, tree.children(id));
        let h_gaps = spacing_total(self.h_spacing, cols.len());
        let v_gaps = spacing_total(self.v_spacing, rows.len());
        let min = Size::new(
            cols.iter().map(|t| t.min).sum::<f32>() + h_gaps,
            rows.iter().map(|t| t.min).sum::<f32>() + v_gaps,
        );
        let pref = Size::new(
            cols.iter().map(|t| t.pref).sum::<f32>() + h_gaps,
            rows.iter().map(|t| t.pref).sum::<f32>() + v_gaps,
        );
        let pref = hint.shrink(insets).constrain(pref).max(min);
        Sizes::new(min, pref, default_max_size(pref)).add_insets(insets)
    }
}

impl Layout for GridLayout {
    fn arrange(&self, ui: &mut Ui, id: WidgetId) -> Result<()> {
        let tree = ui.tree();
        let area = tree.local_inset_bounds(id);
        let children = tree.children(id).to_vec();
        if children.is_empty() {
            return Ok(());
        }
        let (cols, rows) = self.tracks(tree, &children);

        let avail_w = (area.width - spacing_total(self.h_spacing, cols.len())).max(0.0);
        let widths = if self.equal_columns {
            vec![avail_w / cols.len() as f32; cols.len()]
        } else {
            distribute(&cols, avail_w)
        };
        let avail_h = (area.height - spacing_total(self.v_spacing, rows.len())).max(0.0);
        let heights = distribute(&rows, avail_h);

        let mut placed = Vec::with_capacity(children.len());
        let mut y = area.y;
        for (r, &height) in heights.iter().enumerate() {
            let mut x = area.x;
            for (c, &width) in widths.iter().enumerate() {
                let Some(&child) = children.get(r * self.columns + c) else {
                    break;
                };
                let pref = tree.sizes(child, Hint::exact(Size::new(width, height))).pref;
                let data = grid_data(tree, child);
                let (dx, w) = data.h_align.place(width, pref.width);
                let (dy, h) = data.v_align.place(height, pref.height);
                placed.push((child, Rect::new(x + dx, y + dy, w, h)));
                x += width + self.h_spacing;
            }
            y += height + self.v_spacing;
        }

        tracing::debug!(?id, children = placed.len(), "grid arranged");
        for (child, bounds) in placed {
            ui.set_bounds(child, bounds)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, EmptyBorder};
    use crate::layout::FixedSizer;
    use pretty_assertions::assert_eq;

    fn leaf(ui: &mut Ui, parent: WidgetId, w: f32, h: f32) -> WidgetId {
        let id = ui.tree_mut().insert(Block::new("Leaf").with_sizer(FixedSizer::new(Size::new(w, h))));
        ui.tree_mut().add_child(parent, id).unwrap();
        id
    }

    fn bounds_of(ui: &Ui, ids: &[WidgetId]) -> Vec<Rect> {
        ids.iter().map(|&id| ui.tree().bounds(id)).collect()
    }

    // ── Sizing ───────────────────────────────────────────────────────

    #[test]
    fn sizes_sum_columns_and_rows() {
        let mut ui = Ui::new();
        let grid = ui.tree_mut().insert(
            Block::new("Grid")
                .with_layout(GridLayout::new(2).spacing(4.0, 2.0))
                .with_border(EmptyBorder::new(Insets::uniform(1.0))),
        );
        leaf(&mut ui, grid, 10.0, 5.0);
        leaf(&mut ui, grid, 20.0, 8.0);
        leaf(&mut ui, grid, 15.0, 3.0);
        let sizes = ui.tree().sizes(grid, Hint::NONE);
        // columns 15 + 20 + gap 4, rows 8 + 3 + gap 2, plus 1 each side
        assert_eq!(sizes.pref, Size::new(41.0, 15.0));
        assert!(sizes.is_ordered());
    }

    #[test]
    fn equal_columns_use_widest_preference() {
        let mut ui = Ui::new();
        let grid = ui.tree_mut().insert(Block::new("Grid").with_layout(GridLayout::new(2).equal_columns(true)));
        leaf(&mut ui, grid, 40.0, 10.0);
        leaf(&mut ui, grid, 60.0, 10.0);
        assert_eq!(ui.tree().sizes(grid, Hint::NONE).pref, Size::new(120.0, 10.0));
    }

    // ── Arrangement ──────────────────────────────────────────────────

    #[test]
    fn equal_columns_split_width() {
        let mut ui = Ui::new();
        let grid = ui.tree_mut().insert(
            Block::new("Grid")
                .with_bounds(Rect::new(0.0, 0.0, 100.0, 10.0))
                .with_layout(GridLayout::new(2).equal_columns(true)),
        );
        let a = leaf(&mut ui, grid, 40.0, 10.0);
        let b = leaf(&mut ui, grid, 60.0, 10.0);
        GridLayout::new(2).equal_columns(true).arrange(&mut ui, grid).unwrap();
        assert_eq!(
            bounds_of(&ui, &[a, b]),
            vec![Rect::new(0.0, 0.0, 50.0, 10.0), Rect::new(50.0, 0.0, 50.0, 10.0)]
        );
    }

    #[test]
    fn extra_width_goes_to_grabbing_column() {
        let mut ui = Ui::new();
        let layout = GridLayout::new(2).spacing(10.0, 0.0);
        let grid = ui
            .tree_mut()
            .insert(Block::new("Grid").with_bounds(Rect::new(0.0, 0.0, 100.0, 20.0)).with_layout(layout));
        let a = leaf(&mut ui, grid, 20.0, 20.0);
        let b = leaf(&mut ui, grid, 30.0, 20.0);
        let data = std::rc::Rc::new(GridData::default().grab(true, false));
        ui.tree_mut().set_layout_data(b, Some(data));
        layout.arrange(&mut ui, grid).unwrap();
        assert_eq!(
            bounds_of(&ui, &[a, b]),
            vec![Rect::new(0.0, 0.0, 20.0, 20.0), Rect::new(30.0, 0.0, 70.0, 20.0)]
        );
    }

    #[test]
    fn alignment_within_cell() {
        let mut ui = Ui::new();
        let layout = GridLayout::new(1).equal_columns(true);
        let grid = ui
            .tree_mut()
            .insert(Block::new("Grid").with_bounds(Rect::new(0.0, 0.0, 100.0, 10.0)).with_layout(layout));
        let a = leaf(&mut ui, grid, 20.0, 10.0);
        ui.tree_mut()
            .set_layout_data(a, Some(std::rc::Rc::new(GridData::new(Alignment::Middle, Alignment::Start))));
        layout.arrange(&mut ui, grid).unwrap();
        assert_eq!(ui.tree().bounds(a), Rect::new(40.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn arrange_is_idempotent() {
        let mut ui = Ui::new();
        let layout = GridLayout::new(3).spacing(2.0, 2.0);
        let grid = ui
            .tree_mut()
            .insert(Block::new("Grid").with_bounds(Rect::new(0.0, 0.0, 50.0, 30.0)).with_layout(layout));
        let kids: Vec<WidgetId> = (0..7).map(|i| leaf(&mut ui, grid, 5.0 + i as f32 * 3.0, 4.0)).collect();
        layout.arrange(&mut ui, grid).unwrap();
        let first = bounds_of(&ui, &kids);
        layout.arrange(&mut ui, grid).unwrap();
        assert_eq!(bounds_of(&ui, &kids), first);
    }

    #[test]
    fn deficit_shrinks_toward_minimum() {
        let tracks = [
            Track { min: 10.0, pref: 30.0, grab: false },
            Track { min: 10.0, pref: 10.0, grab: false },
        ];
        assert_eq!(distribute(&tracks, 30.0), vec![20.0, 10.0]);
        assert_eq!(distribute(&tracks, 5.0), vec![10.0, 10.0]);
    }
}
