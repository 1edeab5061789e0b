//! A headless canvas that records every call.
//!
//! Geometry in the recorded [`DrawOp`]s is in device space: the canvas keeps
//! track of `translate` calls so a test can check where something landed
//! without replaying the origin stack itself.

use std::fmt::{self, Write as _};

use super::canvas::{Canvas, Paint, Path};
use crate::geometry::{Point, Rect};

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate { dx: f32, dy: f32 },
    ClipRect(Rect),
    ClipPath(Path),
    SetFill(Paint),
    SetStroke(Paint),
    FillRect(Rect),
    StrokeRect(Rect),
    FillPath(Path),
    StrokePath(Path),
    Text { at: Point, text: String },
    Image { image: u64, dest: Rect },
}

/// A [`Canvas`] that keeps a log of everything drawn into it.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    origin: Point,
    saved: Vec<Point>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation recorded so far, in call order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop the log, keeping the current graphics state.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Number of `save` calls not yet matched by a `restore`.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Only the operations that put pixels on the surface.
    pub fn marks(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| {
                matches!(
                    op,
                    DrawOp::FillRect(_)
                        | DrawOp::StrokeRect(_)
                        | DrawOp::FillPath(_)
                        | DrawOp::StrokePath(_)
                        | DrawOp::Text { .. }
                        | DrawOp::Image { .. }
                )
            })
            .collect()
    }

    /// Render the marks as one line each, for snapshot comparisons.
    pub fn marks_to_string(&self) -> String {
        let mut out = String::new();
        for op in self.marks() {
            let _ = writeln!(out, "{op}");
        }
        out
    }

    fn device(&self, rect: Rect) -> Rect {
        rect.translate(self.origin)
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.saved.push(self.origin);
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        if let Some(origin) = self.saved.pop() {
            self.origin = origin;
        }
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.origin = self.origin + Point::new(dx, dy);
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn clip_rect(&mut self, rect: Rect) {
        let rect = self.device(rect);
        self.ops.push(DrawOp::ClipRect(rect));
    }

    fn clip_path(&mut self, path: &Path) {
        self.ops.push(DrawOp::ClipPath(path.clone()));
    }

    fn set_fill(&mut self, paint: Paint) {
        self.ops.push(DrawOp::SetFill(paint));
    }

    fn set_stroke(&mut self, paint: Paint) {
        self.ops.push(DrawOp::SetStroke(paint));
    }

    fn fill_rect(&mut self, rect: Rect) {
        let rect = self.device(rect);
        self.ops.push(DrawOp::FillRect(rect));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        let rect = self.device(rect);
        self.ops.push(DrawOp::StrokeRect(rect));
    }

    fn fill_path(&mut self, path: &Path) {
        self.ops.push(DrawOp::FillPath(path.clone()));
    }

    fn stroke_path(&mut self, path: &Path) {
        self.ops.push(DrawOp::StrokePath(path.clone()));
    }

    fn draw_text(&mut self, at: Point, text: &str) {
        let at = at + self.origin;
        self.ops.push(DrawOp::Text { at, text: text.to_owned() });
    }

    fn draw_image(&mut self, image: u64, dest: Rect) {
        let dest = self.device(dest);
        self.ops.push(DrawOp::Image { image, dest });
    }
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawOp::Save => f.write_str("save"),
            DrawOp::Restore => f.write_str("restore"),
            DrawOp::Translate { dx, dy } => write!(f, "translate {dx},{dy}"),
            DrawOp::ClipRect(r) => write!(f, "clip {r}"),
            DrawOp::ClipPath(p) => write!(f, "clip path({})", p.ops().len()),
            DrawOp::SetFill(p) => write!(f, "fill-paint {}", paint_label(p)),
            DrawOp::SetStroke(p) => write!(f, "stroke-paint {}", paint_label(p)),
            DrawOp::FillRect(r) => write!(f, "fill {r}"),
            DrawOp::StrokeRect(r) => write!(f, "stroke {r}"),
            DrawOp::FillPath(p) => write!(f, "fill path({})", p.ops().len()),
            DrawOp::StrokePath(p) => write!(f, "stroke path({})", p.ops().len()),
            DrawOp::Text { at, text } => write!(f, "text {at} {text:?}"),
            DrawOp::Image { image, dest } => write!(f, "image #{image} {dest}"),
        }
    }
}

fn paint_label(paint: &Paint) -> String {
    match paint {
        Paint::Solid(c) => c.to_string(),
        Paint::LinearGradient { stops, .. } => format!("gradient({})", stops.len()),
    }
}
