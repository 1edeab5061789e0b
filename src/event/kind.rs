//! The closed set of event kinds and their cascade policy.

use std::fmt;

/// Every kind of event the toolkit dispatches.
///
/// The cascade policy is fixed per kind: an unfinished event of a cascading
/// kind is offered to its target's parent target once the target's own
/// handlers have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Paint,
    Resized,
    MouseDown,
    MouseDragged,
    MouseUp,
    MouseEntered,
    MouseMoved,
    MouseExited,
    MouseWheel,
    KeyDown,
    KeyTyped,
    KeyUp,
    FocusGained,
    FocusLost,
    Click,
    Activated,
    Deactivated,
    Closing,
    Closed,
    User,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [EventKind; 20] = [
        EventKind::Paint,
        EventKind::Resized,
        EventKind::MouseDown,
        EventKind::MouseDragged,
        EventKind::MouseUp,
        EventKind::MouseEntered,
        EventKind::MouseMoved,
        EventKind::MouseExited,
        EventKind::MouseWheel,
        EventKind::KeyDown,
        EventKind::KeyTyped,
        EventKind::KeyUp,
        EventKind::FocusGained,
        EventKind::FocusLost,
        EventKind::Click,
        EventKind::Activated,
        EventKind::Deactivated,
        EventKind::Closing,
        EventKind::Closed,
        EventKind::User,
    ];

    /// Whether an unfinished event of this kind propagates to the parent target.
    pub const fn cascades(self) -> bool {
        matches!(
            self,
            EventKind::KeyDown
                | EventKind::KeyTyped
                | EventKind::KeyUp
                | EventKind::MouseWheel
                | EventKind::User
        )
    }

    /// Stable name, used in logs and `Display` output.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Paint => "Paint",
            EventKind::Resized => "Resized",
            EventKind::MouseDown => "MouseDown",
            EventKind::MouseDragged => "MouseDragged",
            EventKind::MouseUp => "MouseUp",
            EventKind::MouseEntered => "MouseEntered",
            EventKind::MouseMoved => "MouseMoved",
            EventKind::MouseExited => "MouseExited",
            EventKind::MouseWheel => "MouseWheel",
            EventKind::KeyDown => "KeyDown",
            EventKind::KeyTyped => "KeyTyped",
            EventKind::KeyUp => "KeyUp",
            EventKind::FocusGained => "FocusGained",
            EventKind::FocusLost => "FocusLost",
            EventKind::Click => "Click",
            EventKind::Activated => "Activated",
            EventKind::Deactivated => "Deactivated",
            EventKind::Closing => "Closing",
            EventKind::Closed => "Closed",
            EventKind::User => "User",
        }
    }

    /// Key events: `KeyDown`, `KeyTyped`, `KeyUp`.
    pub const fn is_key(self) -> bool {
        matches!(self, EventKind::KeyDown | EventKind::KeyTyped | EventKind::KeyUp)
    }

    /// Pointer events carrying `MouseData`: everything but the wheel.
    pub const fn is_mouse(self) -> bool {
        matches!(
            self,
            EventKind::Click
                | EventKind::MouseDown
                | EventKind::MouseDragged
                | EventKind::MouseUp
                | EventKind::MouseEntered
                | EventKind::MouseMoved
                | EventKind::MouseExited
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
