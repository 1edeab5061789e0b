//! Event system: kinds, event values, platform input, handler registry.
//!
//! Dispatch itself lives on [`Ui`](crate::ui::Ui), since handlers need the
//! whole context to do their work.

pub mod data;
pub mod handler;
pub mod input;
pub mod kind;

pub use data::{Event, KeyData, MouseData, Target, WheelData};
pub use handler::{Handler, HandlerId, HandlerRegistry};
pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
pub use kind::EventKind;
