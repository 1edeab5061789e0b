//! Routing platform input into widget events.

use tracing::{debug, trace};

use super::Ui;
use crate::block::WidgetId;
use crate::error::Result;
use crate::event::{
    Event, EventKind, InputEvent, Key, KeyData, KeyEvent, Modifiers, MouseAction, MouseButton, MouseData,
    MouseEvent, WheelData,
};
use crate::geometry::{Point, Rect, Size};
use crate::window::WindowId;

impl Ui {
    /// Deliver one platform input event to `window`.
    ///
    /// Keys go to the focus holder, or the root when nothing has focus. A
    /// `Tab` nobody finished moves the focus. Pointer presses hit-test and
    /// capture the pointer until release; moves track the hovered widget;
    /// the wheel goes to the widget under the pointer and, if unhandled,
    /// scrolls its nearest scrollable ancestor.
    pub fn handle_input(&mut self, window: WindowId, input: InputEvent) -> Result<()> {
        self.require_window(window)?;
        trace!(?window, ?input, "input");
        match input {
            InputEvent::Key(key) => self.key_pressed(window, key),
            InputEvent::KeyReleased(key) => {
                let target = self.key_target(window)?;
                let data = KeyData::new(key.code, key.modifiers);
                self.dispatch(&mut Event::key(EventKind::KeyUp, target, data))
            }
            InputEvent::Paste(text) => {
                let target = self.key_target(window)?;
                for ch in text.chars() {
                    let data = KeyData::new(Key::Char(ch), Modifiers::NONE);
                    self.dispatch(&mut Event::key(EventKind::KeyTyped, target, data))?;
                }
                Ok(())
            }
            InputEvent::Mouse(mouse) => self.mouse(window, mouse),
            InputEvent::Resize { width, height } => {
                let origin = self.require_window(window)?.content_frame.origin();
                self.set_content_frame(window, Rect::from_parts(origin, Size::new(width, height)))
            }
            InputEvent::Activated | InputEvent::Deactivated => {
                let active = matches!(input, InputEvent::Activated);
                if let Some(w) = self.window_mut(window) {
                    w.active = active;
                }
                let kind = if active { EventKind::Activated } else { EventKind::Deactivated };
                debug!(?window, active, "window activation");
                self.dispatch(&mut Event::new(kind, window))
            }
            InputEvent::CloseRequested => self.attempt_close(window).map(drop),
        }
    }

    fn key_target(&self, window: WindowId) -> Result<WidgetId> {
        let root = self.require_window(window)?.root;
        Ok(self.focus(window).unwrap_or(root))
    }

    fn key_pressed(&mut self, window: WindowId, key: KeyEvent) -> Result<()> {
        let target = self.key_target(window)?;
        let mut data = KeyData::new(key.code, key.modifiers);
        data.ch = key.typed_char();
        let mut down = Event::key(EventKind::KeyDown, target, data);
        self.dispatch(&mut down)?;
        if down.finished() {
            return Ok(());
        }
        if data.ch.is_some() {
            return self.dispatch(&mut Event::key(EventKind::KeyTyped, target, data));
        }
        match key.code {
            Key::Tab if key.modifiers.contains(Modifiers::SHIFT) => self.focus_previous(window).map(drop),
            Key::BackTab => self.focus_previous(window).map(drop),
            Key::Tab => self.focus_next(window).map(drop),
            _ => Ok(()),
        }
    }

    /// The widget that takes pointer input at `pt` (window coordinates):
    /// the deepest hit, or its nearest enabled ancestor.
    fn pointer_target(&self, window: WindowId, pt: Point) -> Result<WidgetId> {
        let root = self.require_window(window)?.root;
        let mut id = self.tree.widget_at(root, pt);
        while !self.tree.is_enabled(id) {
            match self.tree.parent(id) {
                Some(parent) => id = parent,
                None => break,
            }
        }
        Ok(id)
    }

    /// Dispatch a pointer event with the position converted to `target`'s
    /// local space.
    fn send_mouse(&mut self, kind: EventKind, target: WidgetId, mouse: &MouseEvent, button: Option<MouseButton>) -> Result<()> {
        let data = MouseData {
            position: self.tree.from_window(target, mouse.position),
            button,
            modifiers: mouse.modifiers,
            click_count: u32::from(button.is_some() && kind != EventKind::MouseDragged),
        };
        self.dispatch(&mut Event::mouse(kind, target, data))
    }

    fn mouse(&mut self, window: WindowId, mouse: MouseEvent) -> Result<()> {
        match mouse.kind {
            MouseAction::Down(button) => {
                let target = self.pointer_target(window, mouse.position)?;
                if let Some(w) = self.window_mut(window) {
                    w.pressed = Some(target);
                }
                let grabs = self
                    .tree
                    .get(target)
                    .is_some_and(|b| b.grabs_focus_when_clicked_on() && b.is_focusable());
                if grabs {
                    self.set_focus(window, Some(target))?;
                }
                self.send_mouse(EventKind::MouseDown, target, &mouse, Some(button))
            }
            MouseAction::Drag(button) => {
                let pressed = self.in_window(window, self.require_window(window)?.pressed);
                let target = match pressed {
                    Some(pressed) => pressed,
                    None => self.pointer_target(window, mouse.position)?,
                };
                self.send_mouse(EventKind::MouseDragged, target, &mouse, Some(button))
            }
            MouseAction::Up(button) => {
                let pressed = self.window_mut(window).and_then(|w| w.pressed.take());
                let pressed = self.in_window(window, pressed);
                let target = match pressed {
                    Some(pressed) => pressed,
                    None => self.pointer_target(window, mouse.position)?,
                };
                self.send_mouse(EventKind::MouseUp, target, &mouse, Some(button))?;
                let inside = self
                    .tree
                    .local_bounds(target)
                    .contains(self.tree.from_window(target, mouse.position));
                if pressed == Some(target) && inside {
                    self.send_mouse(EventKind::Click, target, &mouse, Some(button))?;
                }
                Ok(())
            }
            MouseAction::Moved => {
                let target = self.pointer_target(window, mouse.position)?;
                let previous = self.require_window(window)?.hover;
                if previous != Some(target) {
                    if let Some(w) = self.window_mut(window) {
                        w.hover = Some(target);
                    }
                    if let Some(old) = self.in_window(window, previous) {
                        self.send_mouse(EventKind::MouseExited, old, &mouse, None)?;
                    }
                    self.send_mouse(EventKind::MouseEntered, target, &mouse, None)?;
                }
                self.send_mouse(EventKind::MouseMoved, target, &mouse, None)
            }
            MouseAction::ScrollUp | MouseAction::ScrollDown | MouseAction::ScrollLeft | MouseAction::ScrollRight => {
                let Some(delta) = mouse.kind.wheel_delta() else {
                    return Ok(());
                };
                let target = self.pointer_target(window, mouse.position)?;
                let data = WheelData {
                    position: self.tree.from_window(target, mouse.position),
                    delta,
                    modifiers: mouse.modifiers,
                };
                let mut wheel = Event::wheel(target, data);
                self.dispatch(&mut wheel)?;
                if wheel.finished() {
                    return Ok(());
                }
                let scroller = std::iter::once(target)
                    .chain(self.tree.ancestors(target))
                    .find(|&id| self.tree.scrollable(id).is_some());
                if let Some(scroller) = scroller {
                    let (horizontal, lines) = if delta.x != 0.0 { (true, delta.x) } else { (false, delta.y) };
                    self.scroll_by_lines(scroller, horizontal, lines)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::block::Block;
    use crate::capability::{Capabilities, ChildScroller};
    use crate::window::Window;
    use pretty_assertions::assert_eq;

    type Log = Rc<RefCell<Vec<String>>>;

    fn record(ui: &mut Ui, log: &Log, id: WidgetId, kinds: &[EventKind], name: &'static str) {
        for &kind in kinds {
            let log = log.clone();
            ui.add_handler(id, kind, move |_ui, event| {
                let detail = match (event.key_data(), event.mouse_data()) {
                    (Some(key), _) => format!(" {:?}", key.ch),
                    (_, Some(mouse)) => format!(" {}", mouse.position),
                    _ => String::new(),
                };
                log.borrow_mut().push(format!("{name}:{}{detail}", event.kind()));
                Ok(())
            });
        }
    }

    /// root (100x100) ─┬─ a (0,0 50x50, focusable, grabs focus)
    ///                 └─ b (50,0 50x50, disabled) ─── c (10,10 10x10)
    fn build_ui() -> (Ui, WindowId, WidgetId, WidgetId, WidgetId, WidgetId) {
        let mut ui = Ui::new();
        let root = ui.tree_mut().insert(Block::new("Root"));
        let a = ui.tree_mut().insert(
            Block::new("A")
                .with_bounds(Rect::new(0.0, 0.0, 50.0, 50.0))
                .focusable(true)
                .grab_focus_when_clicked_on(true),
        );
        let b = ui
            .tree_mut()
            .insert(Block::new("B").with_bounds(Rect::new(50.0, 0.0, 50.0, 50.0)).disabled(true));
        let c = ui.tree_mut().insert(Block::new("C").with_bounds(Rect::new(10.0, 10.0, 10.0, 10.0)));
        ui.tree_mut().add_child(root, a).unwrap();
        ui.tree_mut().add_child(root, b).unwrap();
        ui.tree_mut().add_child(b, c).unwrap();
        let window = ui.open_window(root, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        (ui, window, root, a, b, c)
    }

    fn press(ui: &mut Ui, window: WindowId, key: Key) {
        ui.handle_input(window, InputEvent::Key(KeyEvent::new(key, Modifiers::NONE))).unwrap();
    }

    fn mouse(ui: &mut Ui, window: WindowId, kind: MouseAction, x: f32, y: f32) {
        ui.handle_input(window, InputEvent::Mouse(MouseEvent::new(kind, Point::new(x, y)))).unwrap();
    }

    #[test]
    fn keys_go_to_root_without_focus() {
        let (mut ui, window, root, ..) = build_ui();
        let log = Log::default();
        record(&mut ui, &log, root, &[EventKind::KeyDown, EventKind::KeyTyped, EventKind::KeyUp], "root");
        press(&mut ui, window, Key::Char('x'));
        ui.handle_input(window, InputEvent::KeyReleased(KeyEvent::new(Key::Char('x'), Modifiers::NONE)))
            .unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["root:KeyDown Some('x')", "root:KeyTyped Some('x')", "root:KeyUp Some('x')"]
        );
    }

    #[test]
    fn finished_key_down_suppresses_typing() {
        let (mut ui, window, root, ..) = build_ui();
        let log = Log::default();
        ui.add_handler(root, EventKind::KeyDown, |_ui, event| {
            event.finish();
            Ok(())
        });
        record(&mut ui, &log, root, &[EventKind::KeyTyped], "root");
        press(&mut ui, window, Key::Char('x'));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn command_chords_do_not_type() {
        let (mut ui, window, root, ..) = build_ui();
        let log = Log::default();
        record(&mut ui, &log, root, &[EventKind::KeyTyped], "root");
        ui.handle_input(window, InputEvent::Key(KeyEvent::new(Key::Char('c'), Modifiers::CTRL)))
            .unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn paste_types_each_character() {
        let (mut ui, window, _root, a, ..) = build_ui();
        ui.set_focus(window, Some(a)).unwrap();
        let log = Log::default();
        record(&mut ui, &log, a, &[EventKind::KeyTyped], "a");
        ui.handle_input(window, InputEvent::Paste("hi".into())).unwrap();
        assert_eq!(*log.borrow(), vec!["a:KeyTyped Some('h')", "a:KeyTyped Some('i')"]);
    }

    #[test]
    fn tab_moves_focus() {
        let (mut ui, window, root, a, ..) = build_ui();
        let other = ui.tree_mut().insert(Block::new("Other").focusable(true));
        ui.tree_mut().add_child(root, other).unwrap();
        press(&mut ui, window, Key::Tab);
        assert_eq!(ui.focus(window), Some(a));
        press(&mut ui, window, Key::Tab);
        assert_eq!(ui.focus(window), Some(other));
        press(&mut ui, window, Key::BackTab);
        assert_eq!(ui.focus(window), Some(a));
    }

    #[test]
    fn keys_skip_a_detached_focus_holder() {
        let (mut ui, window, root, a, ..) = build_ui();
        ui.set_focus(window, Some(a)).unwrap();
        let log = Log::default();
        record(&mut ui, &log, root, &[EventKind::KeyDown], "root");
        record(&mut ui, &log, a, &[EventKind::KeyDown], "a");

        ui.tree_mut().remove_child(root, a);
        assert_eq!(ui.focus(window), None);
        assert!(!ui.is_focused(a));
        press(&mut ui, window, Key::Char('x'));
        assert_eq!(*log.borrow(), vec!["root:KeyDown Some('x')"]);
    }

    #[test]
    fn release_after_detaching_the_pressed_widget() {
        let (mut ui, window, root, a, ..) = build_ui();
        let log = Log::default();
        record(&mut ui, &log, a, &[EventKind::MouseUp, EventKind::Click], "a");
        record(&mut ui, &log, root, &[EventKind::MouseUp, EventKind::Click], "root");
        mouse(&mut ui, window, MouseAction::Down(MouseButton::Left), 5.0, 5.0);
        ui.tree_mut().remove_from_parent(a);
        mouse(&mut ui, window, MouseAction::Up(MouseButton::Left), 5.0, 5.0);
        assert_eq!(*log.borrow(), vec!["root:MouseUp 5,5"]);
    }

    #[test]
    fn click_grabs_focus_and_reports_local_position() {
        let (mut ui, window, _root, a, ..) = build_ui();
        let log = Log::default();
        record(&mut ui, &log, a, &[EventKind::MouseDown, EventKind::MouseUp, EventKind::Click], "a");
        mouse(&mut ui, window, MouseAction::Down(MouseButton::Left), 5.0, 6.0);
        mouse(&mut ui, window, MouseAction::Up(MouseButton::Left), 7.0, 8.0);
        assert_eq!(ui.focus(window), Some(a));
        assert_eq!(*log.borrow(), vec!["a:MouseDown 5,6", "a:MouseUp 7,8", "a:Click 7,8"]);
    }

    #[test]
    fn pointer_capture_follows_drag_outside() {
        let (mut ui, window, root, a, ..) = build_ui();
        let log = Log::default();
        record(&mut ui, &log, a, &[EventKind::MouseDragged, EventKind::MouseUp, EventKind::Click], "a");
        record(&mut ui, &log, root, &[EventKind::MouseUp], "root");
        mouse(&mut ui, window, MouseAction::Down(MouseButton::Left), 5.0, 5.0);
        mouse(&mut ui, window, MouseAction::Drag(MouseButton::Left), 20.0, 70.0);
        mouse(&mut ui, window, MouseAction::Up(MouseButton::Left), 20.0, 70.0);
        assert_eq!(*log.borrow(), vec!["a:MouseDragged 20,70", "a:MouseUp 20,70"]);
        assert_eq!(ui.window(window).and_then(|w: &Window| w.pressed), None);
    }

    #[test]
    fn disabled_widgets_pass_pointer_input_up() {
        let (mut ui, window, root, _a, b, c) = build_ui();
        let log = Log::default();
        record(&mut ui, &log, root, &[EventKind::MouseDown], "root");
        record(&mut ui, &log, b, &[EventKind::MouseDown], "b");
        record(&mut ui, &log, c, &[EventKind::MouseDown], "c");
        mouse(&mut ui, window, MouseAction::Down(MouseButton::Left), 65.0, 15.0);
        assert_eq!(*log.borrow(), vec!["c:MouseDown 5,5"]);

        ui.set_enabled(c, false);
        log.borrow_mut().clear();
        mouse(&mut ui, window, MouseAction::Down(MouseButton::Left), 65.0, 15.0);
        assert_eq!(*log.borrow(), vec!["root:MouseDown 65,15"]);
    }

    #[test]
    fn hover_tracking() {
        let (mut ui, window, root, a, ..) = build_ui();
        let log = Log::default();
        let kinds = [EventKind::MouseEntered, EventKind::MouseMoved, EventKind::MouseExited];
        record(&mut ui, &log, a, &kinds, "a");
        record(&mut ui, &log, root, &kinds, "root");
        mouse(&mut ui, window, MouseAction::Moved, 1.0, 1.0);
        mouse(&mut ui, window, MouseAction::Moved, 2.0, 1.0);
        mouse(&mut ui, window, MouseAction::Moved, 2.0, 60.0);
        assert_eq!(
            *log.borrow(),
            vec![
                "a:MouseEntered 1,1",
                "a:MouseMoved 1,1",
                "a:MouseMoved 2,1",
                "a:MouseExited 2,60",
                "root:MouseEntered 2,60",
                "root:MouseMoved 2,60",
            ]
        );
    }

    #[test]
    fn unhandled_wheel_scrolls_nearest_scrollable() {
        let mut ui = Ui::new();
        let viewport = ui.tree_mut().insert(
            Block::new("Viewport").with_capabilities(Capabilities::new().with_scrollable(ChildScroller)),
        );
        let content = ui.tree_mut().insert(Block::new("Content").with_bounds(Rect::new(0.0, 0.0, 50.0, 200.0)));
        ui.tree_mut().add_child(viewport, content).unwrap();
        let window = ui.open_window(viewport, Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();

        mouse(&mut ui, window, MouseAction::ScrollDown, 10.0, 10.0);
        assert_eq!(ui.tree().bounds(content).y, -16.0);
        mouse(&mut ui, window, MouseAction::ScrollUp, 10.0, 10.0);
        mouse(&mut ui, window, MouseAction::ScrollUp, 10.0, 10.0);
        assert_eq!(ui.tree().bounds(content).y, 0.0);
    }

    #[test]
    fn resize_and_activation() {
        let (mut ui, window, root, ..) = build_ui();
        let log = Log::default();
        let l = log.clone();
        ui.add_handler(window, EventKind::Activated, move |_ui, _event| {
            l.borrow_mut().push("activated".to_owned());
            Ok(())
        });
        ui.handle_input(window, InputEvent::Resize { width: 120.0, height: 80.0 }).unwrap();
        assert_eq!(ui.tree().bounds(root), Rect::new(0.0, 0.0, 120.0, 80.0));
        ui.handle_input(window, InputEvent::Activated).unwrap();
        assert!(ui.window(window).unwrap().is_active());
        assert_eq!(*log.borrow(), vec!["activated"]);
        ui.handle_input(window, InputEvent::CloseRequested).unwrap();
        assert!(!ui.is_window_valid(window));
    }
}
