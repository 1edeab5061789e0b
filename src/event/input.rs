//! Platform input types.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types:
//! the raw input a platform loop feeds into [`Ui::handle_input`](crate::ui::Ui::handle_input),
//! before it is routed to a widget as a typed [`Event`](super::Event).
//! Crossterm events are converted via `From` impls so the rest of the
//! toolkit never depends on crossterm directly.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// Anything the platform reports that has no variant above.
    Other,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);
    pub const META: Modifiers = Modifiers(8);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether a command-style modifier (Ctrl, Alt or Meta) is held.
    pub fn has_command(self) -> bool {
        self.0 & (Self::CTRL.0 | Self::ALT.0 | Self::META.0) != 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::META, "Meta"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) && !flag.is_empty() {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// The character this key produces as text, if any.
    ///
    /// Command chords (Ctrl/Alt/Meta held) and control characters type nothing.
    pub fn typed_char(&self) -> Option<char> {
        match self.code {
            Key::Char(c) if !c.is_control() && !self.modifiers.has_command() => Some(c),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// MouseButton / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Mouse action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

impl MouseAction {
    /// Wheel direction as a unit delta (`y` positive scrolls down).
    pub fn wheel_delta(self) -> Option<Point> {
        match self {
            MouseAction::ScrollUp => Some(Point::new(0.0, -1.0)),
            MouseAction::ScrollDown => Some(Point::new(0.0, 1.0)),
            MouseAction::ScrollLeft => Some(Point::new(-1.0, 0.0)),
            MouseAction::ScrollRight => Some(Point::new(1.0, 0.0)),
            _ => None,
        }
    }
}

/// A mouse event with action, position in window coordinates, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub position: Point,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    pub fn new(kind: MouseAction, position: Point) -> Self {
        Self { kind, position, modifiers: Modifiers::NONE }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event, as delivered to a window by the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key was pressed (or auto-repeated).
    Key(KeyEvent),
    /// A key was released.
    KeyReleased(KeyEvent),
    Mouse(MouseEvent),
    /// Text pasted into the window in one go.
    Paste(String),
    /// The window's content area changed size.
    Resize { width: f32, height: f32 },
    /// The window became the active window.
    Activated,
    /// The window stopped being the active window.
    Deactivated,
    /// The user asked to close the window.
    CloseRequested,
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;

    let mut out = Modifiers::NONE;
    if m.contains(KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    if m.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        out = out | Modifiers::META;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode;

        let code = match ct.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Insert => Key::Insert,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        };
        KeyEvent { code, modifiers: convert_modifiers(ct.modifiers) }
    }
}

/// Convert a crossterm mouse button to our `MouseButton`.
fn convert_mouse_button(b: crossterm::event::MouseButton) -> MouseButton {
    match b {
        crossterm::event::MouseButton::Left => MouseButton::Left,
        crossterm::event::MouseButton::Right => MouseButton::Right,
        crossterm::event::MouseButton::Middle => MouseButton::Middle,
    }
}

impl From<crossterm::event::MouseEvent> for MouseEvent {
    fn from(me: crossterm::event::MouseEvent) -> Self {
        use crossterm::event::MouseEventKind;

        let kind = match me.kind {
            MouseEventKind::Down(b) => MouseAction::Down(convert_mouse_button(b)),
            MouseEventKind::Up(b) => MouseAction::Up(convert_mouse_button(b)),
            MouseEventKind::Drag(b) => MouseAction::Drag(convert_mouse_button(b)),
            MouseEventKind::Moved => MouseAction::Moved,
            MouseEventKind::ScrollUp => MouseAction::ScrollUp,
            MouseEventKind::ScrollDown => MouseAction::ScrollDown,
            MouseEventKind::ScrollLeft => MouseAction::ScrollLeft,
            MouseEventKind::ScrollRight => MouseAction::ScrollRight,
        };
        MouseEvent {
            kind,
            position: Point::new(f32::from(me.column), f32::from(me.row)),
            modifiers: convert_modifiers(me.modifiers),
        }
    }
}

impl From<crossterm::event::Event> for InputEvent {
    fn from(ct: crossterm::event::Event) -> Self {
        use crossterm::event::{Event, KeyEventKind};

        match ct {
            Event::Key(ke) if ke.kind == KeyEventKind::Release => InputEvent::KeyReleased(ke.into()),
            Event::Key(ke) => InputEvent::Key(ke.into()),
            Event::Mouse(me) => InputEvent::Mouse(me.into()),
            Event::Resize(w, h) => InputEvent::Resize {
                width: f32::from(w),
                height: f32::from(h),
            },
            Event::FocusGained => InputEvent::Activated,
            Event::FocusLost => InputEvent::Deactivated,
            Event::Paste(s) => InputEvent::Paste(s),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
