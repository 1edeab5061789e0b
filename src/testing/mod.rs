//! Headless testing support.
//!
//! Use the [`Pilot`] to drive a window without a platform: simulate input,
//! run queued tasks and paint into a
//! [`RecordingCanvas`](crate::draw::RecordingCanvas) for snapshot-style
//! assertions.

pub mod pilot;

pub use pilot::Pilot;
