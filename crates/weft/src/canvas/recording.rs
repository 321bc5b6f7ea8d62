//! An op-logging surface for tests and draw-call inspection.

use crate::{
    canvas::Canvas,
    color::Color,
    style::{LineCap, TextAlign, TextBaseline},
};

/// One recorded surface call, field for field.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    SetSurfaceSize { width: u32, height: u32 },
    SetDisplaySize { width: f32, height: f32 },
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate { theta: f32 },
    Scale { sx: f32, sy: f32 },
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    ClosePath,
    Fill,
    Stroke,
    FillRect { x: f32, y: f32, width: f32, height: f32 },
    FillText { text: String, x: f32, y: f32 },
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(f32),
    SetLineCap(LineCap),
    SetLineDash(Vec<f32>),
    SetFont { family: String, size: f32 },
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
}

/// A [`Canvas`] that draws nothing and remembers every call in order.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// The calls recorded so far, oldest first.
    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<CanvasOp> {
        self.ops
    }

    /// True if any recorded op satisfies the predicate.
    pub fn saw(&self, predicate: impl FnMut(&CanvasOp) -> bool) -> bool {
        self.ops.iter().any(predicate)
    }
}

impl Canvas for RecordingCanvas {
    fn set_surface_size(&mut self, width: u32, height: u32) {
        self.ops.push(CanvasOp::SetSurfaceSize { width, height });
    }

    fn set_display_size(&mut self, width: f32, height: f32) {
        self.ops.push(CanvasOp::SetDisplaySize { width, height });
    }

    fn save(&mut self) {
        self.ops.push(CanvasOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(CanvasOp::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.ops.push(CanvasOp::Translate { x, y });
    }

    fn rotate(&mut self, theta: f32) {
        self.ops.push(CanvasOp::Rotate { theta });
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.ops.push(CanvasOp::Scale { sx, sy });
    }

    fn begin_path(&mut self) {
        self.ops.push(CanvasOp::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(CanvasOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(CanvasOp::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.ops.push(CanvasOp::ClosePath);
    }

    fn fill(&mut self) {
        self.ops.push(CanvasOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(CanvasOp::Stroke);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(CanvasOp::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.ops.push(CanvasOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(CanvasOp::SetFillColor(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(CanvasOp::SetStrokeColor(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(CanvasOp::SetLineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ops.push(CanvasOp::SetLineCap(cap));
    }

    fn set_line_dash(&mut self, pattern: &[f32]) {
        self.ops.push(CanvasOp::SetLineDash(pattern.to_vec()));
    }

    fn set_font(&mut self, family: &str, size: f32) {
        self.ops.push(CanvasOp::SetFont {
            family: family.to_string(),
            size,
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ops.push(CanvasOp::SetTextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ops.push(CanvasOp::SetTextBaseline(baseline));
    }
}
