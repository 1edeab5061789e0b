//! Integration tests for gilt-blocks.
//!
//! These tests exercise the public API from outside the crate: tree
//! structure, dispatch, layout, painting and input working together.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gilt_blocks::block::{Block, LineBorder, Tree, WidgetId};
use gilt_blocks::capability::{Capabilities, ChildScroller};
use gilt_blocks::color::Color;
use gilt_blocks::draw::RecordingCanvas;
use gilt_blocks::event::{Event, EventKind, Key, KeyData, Modifiers, Target};
use gilt_blocks::geometry::{Point, Rect, Size};
use gilt_blocks::layout::{FixedSizer, FlexData, FlexLayout, GridLayout, Hint, Layout};
use gilt_blocks::testing::Pilot;
use gilt_blocks::window::Surface;
use gilt_blocks::{Ui, UiConfig};
use pretty_assertions::assert_eq;

type Log = Rc<RefCell<Vec<String>>>;

fn log_handler(ui: &mut Ui, log: &Log, target: impl Into<Target>, kind: EventKind, name: &'static str) {
    let log = log.clone();
    ui.add_handler(target, kind, move |_ui, _event| {
        log.borrow_mut().push(name.to_owned());
        Ok(())
    });
}

fn sized(name: &str, w: f32, h: f32) -> Block {
    Block::new(name).with_sizer(FixedSizer::new(Size::new(w, h)))
}

// ---------------------------------------------------------------------------
// Tree structure
// ---------------------------------------------------------------------------

fn assert_membership(tree: &Tree, ids: &[WidgetId]) {
    for &id in ids {
        let holders: Vec<WidgetId> = ids
            .iter()
            .copied()
            .filter(|&p| tree.children(p).contains(&id))
            .collect();
        assert!(holders.len() <= 1, "{id:?} is listed by {} parents", holders.len());
        assert_eq!(tree.parent(id), holders.first().copied());
    }
}

#[test]
fn test_membership_holds_across_moves() {
    let mut tree = Tree::new();
    let ids: Vec<WidgetId> = (0..5).map(|i| tree.insert(Block::new(format!("N{i}")))).collect();
    let script: &[(usize, usize, bool)] = &[
        (0, 1, true),
        (0, 2, true),
        (1, 3, true),
        (2, 3, true),
        (0, 3, true),
        (2, 4, true),
        (0, 3, false),
        (1, 4, true),
        (2, 4, false),
        (4, 2, true),
    ];
    for &(parent, child, add) in script {
        if add {
            tree.add_child(ids[parent], ids[child]).unwrap();
        } else {
            tree.remove_child(ids[parent], ids[child]);
        }
        assert_membership(&tree, &ids);
    }
}

#[test]
fn test_add_child_at_indices() {
    let mut tree = Tree::new();
    let parent = tree.insert(Block::new("P"));
    let a = tree.insert(Block::new("A"));
    let b = tree.insert(Block::new("B"));
    let c = tree.insert(Block::new("C"));
    let d = tree.insert(Block::new("D"));
    tree.add_child_at(parent, a, -1).unwrap();
    tree.add_child_at(parent, b, 10).unwrap();
    assert_eq!(tree.children(parent), &[a, b]);
    tree.add_child_at(parent, c, 1).unwrap();
    assert_eq!(tree.children(parent), &[a, c, b]);
    tree.add_child_at(parent, d, -7).unwrap();
    assert_eq!(tree.children(parent), &[a, c, b, d]);
    assert_eq!(tree.remove_child_at(parent, 9), None);
    assert_eq!(tree.children(parent).len(), 4);
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[test]
fn test_hit_testing_and_window_coordinates() {
    let mut ui = Ui::new();
    let r = ui.tree_mut().insert(Block::new("R"));
    let a = ui.tree_mut().insert(Block::new("A").with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)));
    let b = ui.tree_mut().insert(Block::new("B").with_bounds(Rect::new(10.0, 10.0, 20.0, 20.0)));
    ui.tree_mut().add_child(r, a).unwrap();
    ui.tree_mut().add_child(a, b).unwrap();
    ui.open_window(r, Rect::new(0.0, 0.0, 200.0, 200.0)).unwrap();

    assert_eq!(ui.tree().widget_at(r, Point::new(15.0, 15.0)), b);
    assert_eq!(ui.tree().to_window(b, Point::ZERO), Point::new(10.0, 10.0));
    assert_eq!(ui.tree().from_window(b, Point::new(15.0, 15.0)), Point::new(5.0, 5.0));
}

// ---------------------------------------------------------------------------
// Repaint propagation
// ---------------------------------------------------------------------------

struct Spy(Rc<RefCell<Vec<Rect>>>);

impl Surface for Spy {
    fn request_paint(&mut self, area: Rect) {
        self.0.borrow_mut().push(area);
    }
}

fn spied_ui() -> (Ui, WidgetId, Rc<RefCell<Vec<Rect>>>) {
    let mut ui = Ui::new();
    let root = ui.tree_mut().insert(Block::new("Root"));
    let child = ui.tree_mut().insert(Block::new("Child").with_bounds(Rect::new(10.0, 10.0, 20.0, 20.0)));
    ui.tree_mut().add_child(root, child).unwrap();
    let window = ui.open_window(root, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    let mut canvas = RecordingCanvas::new();
    ui.flush_painting(window, &mut canvas).unwrap();
    let calls = Rc::new(RefCell::new(Vec::new()));
    ui.set_surface(window, Spy(calls.clone())).unwrap();
    (ui, child, calls)
}

#[test]
fn test_repaint_outside_bounds_is_dropped() {
    let (mut ui, child, calls) = spied_ui();
    ui.repaint_bounds(child, Rect::new(25.0, 0.0, 10.0, 10.0));
    ui.repaint_bounds(child, Rect::new(-5.0, -5.0, 5.0, 5.0));
    assert!(calls.borrow().is_empty());
    ui.repaint_bounds(child, Rect::new(15.0, 0.0, 10.0, 10.0));
    assert_eq!(*calls.borrow(), vec![Rect::new(25.0, 10.0, 5.0, 10.0)]);
}

#[test]
fn test_set_bounds_with_equal_rect_is_silent() {
    let (mut ui, child, calls) = spied_ui();
    assert!(!ui.tree().need_layout(child));
    ui.set_bounds(child, Rect::new(10.0, 10.0, 20.0, 20.0)).unwrap();
    assert!(calls.borrow().is_empty());
    assert!(!ui.tree().need_layout(child));
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

fn parent_and_child() -> (Ui, WidgetId, WidgetId) {
    let mut ui = Ui::new();
    let parent = ui.tree_mut().insert(Block::new("Parent"));
    let child = ui.tree_mut().insert(Block::new("Child"));
    ui.tree_mut().add_child(parent, child).unwrap();
    (ui, parent, child)
}

fn typed(target: WidgetId) -> Event<'static> {
    Event::key(EventKind::KeyTyped, target, KeyData::new(Key::Char('k'), Modifiers::NONE))
}

#[test]
fn test_dispatch_order() {
    let (mut ui, parent, child) = parent_and_child();
    let log = Log::default();
    log_handler(&mut ui, &log, child, EventKind::KeyTyped, "h1");
    log_handler(&mut ui, &log, child, EventKind::KeyTyped, "h2");
    log_handler(&mut ui, &log, parent, EventKind::KeyTyped, "h3");
    let mut event = typed(child);
    ui.dispatch(&mut event).unwrap();
    assert_eq!(*log.borrow(), vec!["h1", "h2", "h3"]);
    assert!(!event.finished());
}

#[test]
fn test_dispatch_finish_short_circuits() {
    let (mut ui, parent, child) = parent_and_child();
    let log = Log::default();
    let l = log.clone();
    ui.add_handler(child, EventKind::KeyTyped, move |_ui, event| {
        l.borrow_mut().push("h1".to_owned());
        event.finish();
        Ok(())
    });
    log_handler(&mut ui, &log, child, EventKind::KeyTyped, "h2");
    log_handler(&mut ui, &log, parent, EventKind::KeyTyped, "h3");
    ui.dispatch(&mut typed(child)).unwrap();
    assert_eq!(*log.borrow(), vec!["h1"]);
}

#[test]
fn test_non_cascading_kind_without_handlers() {
    let (mut ui, parent, child) = parent_and_child();
    let log = Log::default();
    log_handler(&mut ui, &log, parent, EventKind::FocusGained, "parent");
    log_handler(&mut ui, &log, Target::App, EventKind::FocusGained, "app");
    let mut event = Event::new(EventKind::FocusGained, child);
    ui.dispatch(&mut event).unwrap();
    assert!(log.borrow().is_empty());
    assert!(!event.finished());
}

#[test]
fn test_user_events_carry_data_and_cascade() {
    let (mut ui, parent, child) = parent_and_child();
    let seen = Rc::new(RefCell::new(None));
    let s = seen.clone();
    ui.add_handler(parent, EventKind::User, move |_ui, event| {
        *s.borrow_mut() = event.user_data::<u32>().copied();
        Ok(())
    });
    ui.dispatch(&mut Event::user(child, 42_u32)).unwrap();
    assert_eq!(*seen.borrow(), Some(42));
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn test_equal_two_column_grid() {
    let mut ui = Ui::new();
    let layout = GridLayout::new(2).equal_columns(true);
    let grid = ui
        .tree_mut()
        .insert(Block::new("Grid").with_bounds(Rect::new(0.0, 0.0, 100.0, 20.0)).with_layout(layout));
    let a = ui.tree_mut().insert(sized("A", 40.0, 20.0));
    let b = ui.tree_mut().insert(sized("B", 60.0, 20.0));
    ui.tree_mut().add_child(grid, a).unwrap();
    ui.tree_mut().add_child(grid, b).unwrap();
    ui.validate_layout(grid).unwrap();
    assert_eq!(ui.tree().bounds(a), Rect::new(0.0, 0.0, 50.0, 20.0));
    assert_eq!(ui.tree().bounds(b), Rect::new(50.0, 0.0, 50.0, 20.0));
}

#[test]
fn test_arrange_is_idempotent() {
    let mut ui = Ui::new();
    let layout = FlexLayout::row().gap(3.0);
    let row = ui
        .tree_mut()
        .insert(Block::new("Row").with_bounds(Rect::new(0.0, 0.0, 97.0, 13.0)).with_layout(layout));
    let mut kids = Vec::new();
    for (i, w) in [12.0, 7.5, 30.0].into_iter().enumerate() {
        let id = ui.tree_mut().insert(sized("Kid", w, 5.0).with_layout_data(FlexData::grow(i as f32)));
        ui.tree_mut().add_child(row, id).unwrap();
        kids.push(id);
    }
    layout.arrange(&mut ui, row).unwrap();
    let first: Vec<Rect> = kids.iter().map(|&k| ui.tree().bounds(k)).collect();
    layout.arrange(&mut ui, row).unwrap();
    let second: Vec<Rect> = kids.iter().map(|&k| ui.tree().bounds(k)).collect();
    assert_eq!(first, second);
}

#[test]
fn test_sizes_fall_back_without_sizer() {
    let mut ui = Ui::new();
    let plain = ui.tree_mut().insert(Block::new("Plain"));
    let sizes = ui.tree().sizes(plain, Hint::NONE);
    assert!(sizes.is_ordered());
    assert_eq!(sizes.min, Size::ZERO);
}

// ---------------------------------------------------------------------------
// Painting
// ---------------------------------------------------------------------------

#[test]
fn test_nested_paint_trace() {
    let mut pilot = Pilot::new(40.0, 20.0);
    let root = pilot.root();
    pilot.ui_mut().set_background(root, Color::WHITE);
    let panel = pilot
        .add(
            root,
            Block::new("Panel")
                .with_bounds(Rect::new(5.0, 5.0, 20.0, 10.0))
                .with_border(LineBorder::uniform(Color::BLACK, 1.0)),
        )
        .unwrap();
    let label = pilot
        .add(panel, Block::new("Label").with_bounds(Rect::new(2.0, 2.0, 8.0, 3.0)))
        .unwrap();
    pilot.ui_mut().add_handler(label, EventKind::Paint, |_ui, event| {
        if let Some(canvas) = event.canvas() {
            canvas.draw_text(Point::ZERO, "hi");
        }
        Ok(())
    });

    let marks = pilot.render_all().unwrap();
    insta::assert_snapshot!(marks.trim_end(), @r#"
    fill 0,0 40x20
    fill 5,5 20x1
    fill 5,14 20x1
    fill 5,6 1x8
    fill 24,6 1x8
    text 7,7 "hi"
    "#);
    assert_eq!(pilot.canvas().depth(), 0);
}

// ---------------------------------------------------------------------------
// Input and focus
// ---------------------------------------------------------------------------

#[test]
fn test_typing_into_focused_field() {
    let mut pilot = Pilot::new(40.0, 10.0);
    let root = pilot.root();
    let field = pilot
        .add(
            root,
            Block::new("Field")
                .with_bounds(Rect::new(0.0, 0.0, 40.0, 1.0))
                .focusable(true)
                .grab_focus_when_clicked_on(true),
        )
        .unwrap();
    let text = Rc::new(RefCell::new(String::new()));
    let t = text.clone();
    pilot.ui_mut().add_handler(field, EventKind::KeyTyped, move |_ui, event| {
        if let Some(ch) = event.key_data().and_then(|k| k.ch) {
            t.borrow_mut().push(ch);
            event.finish();
        }
        Ok(())
    });

    pilot.type_text("lost").unwrap();
    assert_eq!(*text.borrow(), "");
    pilot.click(3.0, 0.5).unwrap();
    pilot.type_text("kept").unwrap();
    assert_eq!(*text.borrow(), "kept");
}

#[test]
fn test_wheel_scrolls_viewport() {
    let mut pilot = Pilot::with_config(UiConfig::new().with_line_scroll_amount(4.0), 20.0, 10.0);
    let root = pilot.root();
    let viewport = pilot
        .add(
            root,
            Block::new("Viewport")
                .with_bounds(Rect::new(0.0, 0.0, 20.0, 10.0))
                .with_capabilities(Capabilities::new().with_scrollable(ChildScroller)),
        )
        .unwrap();
    let content = pilot
        .add(viewport, Block::new("Content").with_bounds(Rect::new(0.0, 0.0, 20.0, 30.0)))
        .unwrap();
    for _ in 0..10 {
        pilot.scroll(5.0, 5.0, false).unwrap();
    }
    assert_eq!(pilot.ui().tree().bounds(content).origin(), Point::new(0.0, -20.0));
    assert_eq!(pilot.ui().scrolled_position(viewport, false), 20.0);
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_delayed_task_repaints() {
    let mut pilot = Pilot::new(10.0, 10.0);
    let root = pilot.root();
    pilot.render().unwrap();
    pilot.ui_mut().invoke_after(Duration::from_secs(1), move |ui| {
        ui.set_background(root, Color::BLACK);
        Ok(())
    });
    assert_eq!(pilot.process().unwrap(), 0);
    pilot.ui_mut().wait_for_tasks().await;
    assert_eq!(pilot.process().unwrap(), 1);
    insta::assert_snapshot!(pilot.render().unwrap().trim_end(), @"fill 0,0 10x10");
}
