//! Drawing contract: the canvas a block paints into.
//!
//! The tree never talks to a platform surface. It only calls [`Canvas`]
//! methods from inside painting, and platform bridges supply the
//! implementation. [`RecordingCanvas`] is a headless implementation that
//! keeps every call as a [`DrawOp`].

pub mod canvas;
pub mod recording;

pub use canvas::{Canvas, GradientStop, Paint, Path, PathOp};
pub use recording::{DrawOp, RecordingCanvas};
