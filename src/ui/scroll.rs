//! Scrolling through the optional `Pager` and `Scrollable` capabilities.

use super::Ui;
use crate::block::WidgetId;
use crate::error::Result;

impl Ui {
    /// Distance of one line step for `id`: its pager's answer, or the
    /// configured default.
    pub fn line_scroll_amount(&self, id: WidgetId, horizontal: bool, towards_start: bool) -> f32 {
        match self.tree.pager(id) {
            Some(pager) => pager.line_scroll_amount(&self.tree, id, horizontal, towards_start),
            None => self.config.line_scroll_amount,
        }
    }

    /// Distance of one page step for `id`: its pager's answer, or the
    /// visible extent of the viewport (the widget's own extent when it is not
    /// scrollable).
    pub fn page_scroll_amount(&self, id: WidgetId, horizontal: bool, towards_start: bool) -> f32 {
        if let Some(pager) = self.tree.pager(id) {
            return pager.page_scroll_amount(&self.tree, id, horizontal, towards_start);
        }
        if let Some(scrollable) = self.tree.scrollable(id) {
            return scrollable.visible_size(&self.tree, id, horizontal);
        }
        let size = self.tree.bounds(id).size();
        if horizontal {
            size.width
        } else {
            size.height
        }
    }

    /// Current scroll offset, zero for widgets that cannot scroll.
    pub fn scrolled_position(&self, id: WidgetId, horizontal: bool) -> f32 {
        self.tree
            .scrollable(id)
            .map_or(0.0, |s| s.scrolled_position(&self.tree, id, horizontal))
    }

    /// Scroll `id` to `position`, clamped to the content.
    ///
    /// Returns whether the position changed. Widgets without the
    /// `Scrollable` capability never scroll.
    pub fn scroll_to(&mut self, id: WidgetId, horizontal: bool, position: f32) -> Result<bool> {
        let Some(scrollable) = self.tree.scrollable(id) else {
            return Ok(false);
        };
        let visible = scrollable.visible_size(&self.tree, id, horizontal);
        let content = scrollable.content_size(&self.tree, id, horizontal);
        let target = position.clamp(0.0, (content - visible).max(0.0));
        if target == scrollable.scrolled_position(&self.tree, id, horizontal) {
            return Ok(false);
        }
        scrollable.set_scrolled_position(self, id, horizontal, target)?;
        Ok(true)
    }

    /// Scroll by `lines` line steps; negative values scroll towards the start.
    pub fn scroll_by_lines(&mut self, id: WidgetId, horizontal: bool, lines: f32) -> Result<bool> {
        let step = self.line_scroll_amount(id, horizontal, lines < 0.0);
        let position = self.scrolled_position(id, horizontal) + step * lines;
        self.scroll_to(id, horizontal, position)
    }

    /// Scroll by `pages` page steps; negative values scroll towards the start.
    pub fn scroll_by_pages(&mut self, id: WidgetId, horizontal: bool, pages: f32) -> Result<bool> {
        let step = self.page_scroll_amount(id, horizontal, pages < 0.0);
        let position = self.scrolled_position(id, horizontal) + step * pages;
        self.scroll_to(id, horizontal, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::capability::{Capabilities, ChildScroller, FixedPager};
    use crate::geometry::{Point, Rect};
    use crate::ui::UiConfig;
    use pretty_assertions::assert_eq;

    fn scroll_area(ui: &mut Ui, capabilities: Capabilities) -> (WidgetId, WidgetId) {
        let viewport = ui.tree_mut().insert(
            Block::new("Viewport")
                .with_bounds(Rect::new(0.0, 0.0, 40.0, 30.0))
                .with_capabilities(capabilities),
        );
        let content = ui.tree_mut().insert(Block::new("Content").with_bounds(Rect::new(0.0, 0.0, 100.0, 90.0)));
        ui.tree_mut().add_child(viewport, content).unwrap();
        (viewport, content)
    }

    #[test]
    fn fallbacks_without_capabilities() {
        let mut ui = Ui::with_config(UiConfig::new().with_line_scroll_amount(12.0));
        let plain = ui.tree_mut().insert(Block::new("Plain").with_bounds(Rect::new(0.0, 0.0, 40.0, 25.0)));
        assert_eq!(ui.line_scroll_amount(plain, false, false), 12.0);
        assert_eq!(ui.page_scroll_amount(plain, false, false), 25.0);
        assert_eq!(ui.page_scroll_amount(plain, true, true), 40.0);
        assert_eq!(ui.scrolled_position(plain, false), 0.0);
        assert!(!ui.scroll_to(plain, false, 10.0).unwrap());
    }

    #[test]
    fn pager_overrides_steps() {
        let mut ui = Ui::new();
        let caps = Capabilities::new()
            .with_pager(FixedPager { line: 3.0, page: 20.0 })
            .with_scrollable(ChildScroller);
        let (viewport, content) = scroll_area(&mut ui, caps);
        assert_eq!(ui.line_scroll_amount(viewport, false, false), 3.0);
        assert_eq!(ui.page_scroll_amount(viewport, false, false), 20.0);

        assert!(ui.scroll_by_lines(viewport, false, 2.0).unwrap());
        assert_eq!(ui.tree().bounds(content).origin(), Point::new(0.0, -6.0));
        assert!(ui.scroll_by_pages(viewport, true, 1.0).unwrap());
        assert_eq!(ui.tree().bounds(content).origin(), Point::new(-20.0, -6.0));
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let mut ui = Ui::new();
        let (viewport, content) = scroll_area(&mut ui, Capabilities::new().with_scrollable(ChildScroller));
        assert_eq!(ui.page_scroll_amount(viewport, false, false), 30.0);

        assert!(ui.scroll_to(viewport, false, 500.0).unwrap());
        assert_eq!(ui.scrolled_position(viewport, false), 60.0);
        assert!(!ui.scroll_by_pages(viewport, false, 1.0).unwrap());

        assert!(ui.scroll_to(viewport, true, -5.0).is_ok());
        assert_eq!(ui.tree().bounds(content).origin(), Point::new(0.0, -60.0));
        assert!(ui.scroll_by_lines(viewport, false, -1.0).unwrap());
        assert_eq!(ui.scrolled_position(viewport, false), 44.0);
    }
}
