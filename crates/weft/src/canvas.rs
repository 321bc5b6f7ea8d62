//! The render-target contract for the canvas driver family.
//!
//! [`CanvasDriver`](crate::driver::CanvasDriver) expresses a diagram as calls
//! against this trait, so anything that can honor the usual 2D-surface verbs
//! can be driven: the bundled [`PixmapCanvas`] rasterizer, the
//! [`RecordingCanvas`] op log, or a caller's own surface binding.
//!
//! State semantics follow the conventional 2D canvas model: a save/restore
//! stack covers the transform and every style setter, path verbs assemble a
//! current path that `fill`/`stroke` consume as often as they like until the
//! next `begin_path`, and `rotate` takes radians.

pub mod pixmap;
pub mod recording;

pub use pixmap::PixmapCanvas;
pub use recording::{CanvasOp, RecordingCanvas};

use crate::{
    color::Color,
    style::{LineCap, TextAlign, TextBaseline},
};

/// A 2D drawing surface.
pub trait Canvas {
    /// Sizes the backing store in device pixels, discarding existing content.
    fn set_surface_size(&mut self, width: u32, height: u32);

    /// Presentation size in logical pixels, for surfaces that distinguish
    /// backing resolution from display size. Most don't; the default does
    /// nothing.
    fn set_display_size(&mut self, _width: f32, _height: f32) {}

    /// Pushes the current transform and style state.
    fn save(&mut self);

    /// Pops back to the most recently saved state. Extra restores with an
    /// empty stack are ignored.
    fn restore(&mut self);

    fn translate(&mut self, x: f32, y: f32);

    /// Rotates the current frame by `theta` radians.
    fn rotate(&mut self, theta: f32);

    fn scale(&mut self, sx: f32, sy: f32);

    /// Discards the current path and starts a fresh one.
    fn begin_path(&mut self);

    fn move_to(&mut self, x: f32, y: f32);

    fn line_to(&mut self, x: f32, y: f32);

    fn close_path(&mut self);

    /// Fills the current path with the fill color.
    fn fill(&mut self);

    /// Strokes the current path with the stroke color, width, cap, and dash.
    fn stroke(&mut self);

    /// Fills an axis-aligned rectangle without touching the current path.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Draws one line of text anchored at (x, y) per the current alignment
    /// and baseline settings.
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    fn set_fill_color(&mut self, color: Color);

    fn set_stroke_color(&mut self, color: Color);

    fn set_line_width(&mut self, width: f32);

    fn set_line_cap(&mut self, cap: LineCap);

    /// Sets the stroke dash pattern; an empty slice means solid.
    fn set_line_dash(&mut self, pattern: &[f32]);

    fn set_font(&mut self, family: &str, size: f32);

    fn set_text_align(&mut self, align: TextAlign);

    fn set_text_baseline(&mut self, baseline: TextBaseline);
}
