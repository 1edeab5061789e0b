//! Pilot: programmatic interaction with a headless window.
//!
//! The `Pilot` owns a [`Ui`] with one open window and provides methods to
//! simulate user input (key presses, clicks, pointer moves, resize), run
//! queued tasks, and paint into a [`RecordingCanvas`] for snapshot testing.

use crate::block::{Block, WidgetId};
use crate::draw::RecordingCanvas;
use crate::error::{Result, TreeError};
use crate::event::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
use crate::geometry::{Point, Rect};
use crate::ui::{Ui, UiConfig};
use crate::window::WindowId;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless window driver for testing.
///
/// # Examples
///
/// ```
/// use gilt_blocks::event::{EventKind, Key};
/// use gilt_blocks::testing::Pilot;
///
/// let mut pilot = Pilot::new(80.0, 24.0);
/// let root = pilot.root();
/// pilot.ui_mut().add_handler(root, EventKind::KeyTyped, |_ui, event| {
///     event.finish();
///     Ok(())
/// });
/// pilot.press_key(Key::Char('a')).unwrap();
/// ```
pub struct Pilot {
    ui: Ui,
    window: WindowId,
    canvas: RecordingCanvas,
}

impl Pilot {
    /// Open a window of the given size with an empty root block.
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_config(UiConfig::default(), width, height)
    }

    /// Like [`new`](Self::new), with a custom config.
    pub fn with_config(config: UiConfig, width: f32, height: f32) -> Self {
        let mut ui = Ui::with_config(config);
        let root = ui.tree_mut().insert(Block::new("Root"));
        let frame = Rect::new(0.0, 0.0, width, height);
        let window = match ui.open_window(root, frame) {
            Ok(window) => window,
            Err(err) => unreachable!("fresh root rejected: {err}"),
        };
        Self { ui, window, canvas: RecordingCanvas::new() }
    }

    /// Drive a window of an existing `Ui`.
    pub fn attach(ui: Ui, window: WindowId) -> Result<Self, TreeError> {
        if !ui.is_window_valid(window) {
            return Err(TreeError::UnknownWindow(window));
        }
        Ok(Self { ui, window, canvas: RecordingCanvas::new() })
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) -> Result<()> {
        self.press_key_with(key, Modifiers::NONE)
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> Result<()> {
        self.input(InputEvent::Key(KeyEvent::new(key, modifiers)))
    }

    /// Simulate a key release.
    pub fn release_key(&mut self, key: Key) -> Result<()> {
        self.input(InputEvent::KeyReleased(KeyEvent::new(key, Modifiers::NONE)))
    }

    /// Simulate typing each character of `text` as individual key presses.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            self.press_key(Key::Char(ch))?;
        }
        Ok(())
    }

    /// Simulate a left-button click (press and release) at (x, y).
    pub fn click(&mut self, x: f32, y: f32) -> Result<()> {
        self.mouse(MouseAction::Down(MouseButton::Left), x, y)?;
        self.mouse(MouseAction::Up(MouseButton::Left), x, y)
    }

    /// Simulate a left-button drag from one point to another.
    pub fn drag(&mut self, from: (f32, f32), to: (f32, f32)) -> Result<()> {
        self.mouse(MouseAction::Down(MouseButton::Left), from.0, from.1)?;
        self.mouse(MouseAction::Drag(MouseButton::Left), to.0, to.1)?;
        self.mouse(MouseAction::Up(MouseButton::Left), to.0, to.1)
    }

    /// Simulate the pointer moving to (x, y).
    pub fn move_to(&mut self, x: f32, y: f32) -> Result<()> {
        self.mouse(MouseAction::Moved, x, y)
    }

    /// Simulate one wheel notch down (or up when `up` is set) at (x, y).
    pub fn scroll(&mut self, x: f32, y: f32, up: bool) -> Result<()> {
        let action = if up { MouseAction::ScrollUp } else { MouseAction::ScrollDown };
        self.mouse(action, x, y)
    }

    /// Simulate a window resize.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.input(InputEvent::Resize { width, height })
    }

    fn mouse(&mut self, action: MouseAction, x: f32, y: f32) -> Result<()> {
        self.input(InputEvent::Mouse(MouseEvent::new(action, Point::new(x, y))))
    }

    /// Deliver any raw input event.
    pub fn input(&mut self, event: InputEvent) -> Result<()> {
        self.ui.handle_input(self.window, event)
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Run every queued task that is due. Returns how many ran.
    pub fn process(&mut self) -> Result<usize> {
        self.ui.run_pending()
    }

    /// Validate layout and paint the pending area into a fresh recording.
    ///
    /// Returns the painted marks, one per line.
    pub fn render(&mut self) -> Result<String> {
        self.canvas.clear();
        self.ui.flush_painting(self.window, &mut self.canvas)?;
        Ok(self.canvas.marks_to_string())
    }

    /// Repaint the whole window, then [`render`](Self::render).
    pub fn render_all(&mut self) -> Result<String> {
        self.ui.repaint_window(self.window);
        self.render()
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// The window's root block.
    pub fn root(&self) -> WidgetId {
        self.ui.window(self.window).map_or_else(WidgetId::default, |w| w.root())
    }

    /// The canvas the last render painted into.
    pub fn canvas(&self) -> &RecordingCanvas {
        &self.canvas
    }

    /// The current focus holder.
    pub fn focused(&self) -> Option<WidgetId> {
        self.ui.focus(self.window)
    }

    /// Whether the window is still open.
    pub fn is_open(&self) -> bool {
        self.ui.is_window_valid(self.window)
    }

    /// Insert `block` as the last child of `parent`.
    pub fn add(&mut self, parent: WidgetId, block: Block) -> Result<WidgetId, TreeError> {
        let id = self.ui.tree_mut().insert(block);
        self.ui.tree_mut().add_child(parent, id)?;
        Ok(id)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
