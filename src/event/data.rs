//! Event values: target, finished flag, kind-specific payload.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::input::{Key, Modifiers, MouseButton};
use super::kind::EventKind;
use crate::block::WidgetId;
use crate::draw::Canvas;
use crate::geometry::{Point, Rect};
use crate::window::WindowId;

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// Anything handlers can be registered on.
///
/// Parent targets form a chain: a widget's parent is its structural parent,
/// or its window when it is a window root; a window's parent is the
/// application; the application has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Widget(WidgetId),
    Window(WindowId),
    App,
}

impl From<WidgetId> for Target {
    fn from(id: WidgetId) -> Self {
        Target::Widget(id)
    }
}

impl From<WindowId> for Target {
    fn from(id: WindowId) -> Self {
        Target::Window(id)
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Payload of `KeyDown`, `KeyTyped` and `KeyUp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyData {
    pub key: Key,
    /// The character the key produces, if any.
    pub ch: Option<char>,
    pub modifiers: Modifiers,
    pub repeat: bool,
}

impl KeyData {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        let ch = match key {
            Key::Char(c) => Some(c),
            _ => None,
        };
        Self { key, ch, modifiers, repeat: false }
    }
}

/// Payload of the pointer kinds other than the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseData {
    /// Pointer location in the target's local coordinates.
    pub position: Point,
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
    pub click_count: u32,
}

impl MouseData {
    pub fn new(position: Point) -> Self {
        Self { position, button: None, modifiers: Modifiers::NONE, click_count: 0 }
    }
}

/// Payload of `MouseWheel`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelData {
    /// Pointer location in the target's local coordinates.
    pub position: Point,
    /// Scroll amount in lines; `y` positive scrolls down.
    pub delta: Point,
    pub modifiers: Modifiers,
}

enum Payload<'a> {
    None,
    Key(KeyData),
    Mouse(MouseData),
    Wheel(WheelData),
    Paint { canvas: &'a mut dyn Canvas, dirty: Rect },
    User(Rc<dyn Any>),
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One occurrence being dispatched.
///
/// Built right before dispatch and dropped right after. The target and
/// payload are fixed at construction; the only mutable state is the finished
/// flag, which moves from `false` to `true` at most once.
pub struct Event<'a> {
    kind: EventKind,
    target: Target,
    finished: bool,
    payload: Payload<'a>,
}

impl<'a> Event<'a> {
    /// An event with no payload (resize, focus, window lifecycle).
    pub fn new(kind: EventKind, target: impl Into<Target>) -> Self {
        Self::with_payload(kind, target.into(), Payload::None)
    }

    /// A key event. `kind` must be one of the key kinds.
    pub fn key(kind: EventKind, target: impl Into<Target>, data: KeyData) -> Self {
        debug_assert!(kind.is_key(), "{kind} is not a key event");
        Self::with_payload(kind, target.into(), Payload::Key(data))
    }

    /// A pointer event. `kind` must be one of the mouse kinds.
    pub fn mouse(kind: EventKind, target: impl Into<Target>, data: MouseData) -> Self {
        debug_assert!(kind.is_mouse(), "{kind} is not a mouse event");
        Self::with_payload(kind, target.into(), Payload::Mouse(data))
    }

    pub fn wheel(target: impl Into<Target>, data: WheelData) -> Self {
        Self::with_payload(EventKind::MouseWheel, target.into(), Payload::Wheel(data))
    }

    /// A paint event drawing into `canvas`, already translated and clipped to
    /// the target's local space. `dirty` is in that space too.
    pub fn paint(target: impl Into<Target>, canvas: &'a mut dyn Canvas, dirty: Rect) -> Self {
        Self::with_payload(EventKind::Paint, target.into(), Payload::Paint { canvas, dirty })
    }

    /// An application-defined event carrying an arbitrary value.
    pub fn user<T: Any>(target: impl Into<Target>, data: T) -> Self {
        Self::with_payload(EventKind::User, target.into(), Payload::User(Rc::new(data)))
    }

    fn with_payload(kind: EventKind, target: Target, payload: Payload<'a>) -> Self {
        Self { kind, target, finished: false, payload }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The original target. Cascading never changes it.
    pub fn target(&self) -> Target {
        self.target
    }

    /// Whether an unfinished event is offered to the parent target.
    pub fn cascades(&self) -> bool {
        self.kind.cascades()
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Mark the event handled. Idempotent.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn key_data(&self) -> Option<&KeyData> {
        match &self.payload {
            Payload::Key(data) => Some(data),
            _ => None,
        }
    }

    pub fn mouse_data(&self) -> Option<&MouseData> {
        match &self.payload {
            Payload::Mouse(data) => Some(data),
            _ => None,
        }
    }

    pub fn wheel_data(&self) -> Option<&WheelData> {
        match &self.payload {
            Payload::Wheel(data) => Some(data),
            _ => None,
        }
    }

    /// The canvas of a paint event.
    pub fn canvas(&mut self) -> Option<&mut dyn Canvas> {
        match &mut self.payload {
            Payload::Paint { canvas, .. } => Some(&mut **canvas),
            _ => None,
        }
    }

    /// The area of a paint event that needs drawing.
    pub fn dirty_rect(&self) -> Option<Rect> {
        match &self.payload {
            Payload::Paint { dirty, .. } => Some(*dirty),
            _ => None,
        }
    }

    /// The value of a user event, if it is a `T`.
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        match &self.payload {
            Payload::User(data) => data.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.kind)?;
        match &self.payload {
            Payload::None | Payload::User(_) => {}
            Payload::Key(k) => {
                write!(f, "Code: {:?}, ", k.key)?;
                if let Some(ch) = k.ch {
                    write!(f, "Rune: {ch}, ")?;
                }
            }
            Payload::Mouse(m) => {
                write!(f, "Where: {}, ", m.position)?;
                if let Some(button) = m.button {
                    write!(f, "Button: {button:?}, ")?;
                }
                if m.click_count > 0 {
                    write!(f, "Clicks: {}, ", m.click_count)?;
                }
            }
            Payload::Wheel(w) => write!(f, "Where: {}, Delta: {}, ", w.position, w.delta)?,
            Payload::Paint { dirty, .. } => write!(f, "Dirty: [{dirty}], ")?,
        }
        write!(f, "Target: {:?}", self.target)?;
        let modifiers = match &self.payload {
            Payload::Key(k) => k.modifiers,
            Payload::Mouse(m) => m.modifiers,
            Payload::Wheel(w) => w.modifiers,
            _ => Modifiers::NONE,
        };
        if !modifiers.is_empty() {
            write!(f, ", {modifiers}")?;
        }
        if self.finished {
            f.write_str(", Finished")?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
