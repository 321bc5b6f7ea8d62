//! A CPU raster surface backed by tiny-skia, with cosmic-text shaping for
//! label text.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache};
use log::{info, warn};
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, StrokeDash,
    Transform,
};

use crate::{
    canvas::Canvas,
    color::Color,
    error::WeftError,
    style::{LineCap, TextAlign, TextBaseline},
};

/// Transform plus every style setter, saved and restored as one unit.
#[derive(Debug, Clone)]
struct DrawState {
    transform: Transform,
    fill_color: Color,
    stroke_color: Color,
    line_width: f32,
    line_cap: LineCap,
    dash: Vec<f32>,
    font_family: String,
    font_size: f32,
    text_align: TextAlign,
    text_baseline: TextBaseline,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            fill_color: Color::default(),
            stroke_color: Color::default(),
            line_width: 1.0,
            line_cap: LineCap::default(),
            dash: Vec::new(),
            font_family: "sans-serif".to_string(),
            font_size: 13.0,
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
        }
    }
}

/// A [`Canvas`] that rasterizes into an in-memory [`Pixmap`].
///
/// The pixmap starts at 1x1; callers size it through
/// [`set_surface_size`](Canvas::set_surface_size) before drawing. Text is
/// shaped with cosmic-text against the system font set, so glyph output
/// depends on the fonts installed where rendering runs.
pub struct PixmapCanvas {
    pixmap: Pixmap,
    current: DrawState,
    stack: Vec<DrawState>,
    builder: PathBuilder,
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl PixmapCanvas {
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            pixmap: Pixmap::new(1, 1).expect("1x1 is a valid pixmap size"),
            current: DrawState::default(),
            stack: Vec::new(),
            builder: PathBuilder::new(),
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    /// The rasterized surface.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Consumes the canvas, returning the rasterized surface.
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Encodes the surface as a PNG byte stream.
    pub fn encode_png(&self) -> Result<Vec<u8>, WeftError> {
        self.pixmap
            .encode_png()
            .map_err(|err| WeftError::Surface(format!("PNG encoding failed: {err}")))
    }

    fn fill_paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        let [r, g, b, a] = self.current.fill_color.to_rgba8();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }

    fn stroke_paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        let [r, g, b, a] = self.current.stroke_color.to_rgba8();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }
}

impl Default for PixmapCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for PixmapCanvas {
    fn set_surface_size(&mut self, width: u32, height: u32) {
        // A zero-area diagram still needs a valid surface to encode.
        let (width, height) = (width.max(1), height.max(1));
        match Pixmap::new(width, height) {
            Some(pixmap) => self.pixmap = pixmap,
            None => {
                warn!(width = width, height = height; "pixmap allocation failed, keeping previous surface");
            }
        }
    }

    fn save(&mut self) {
        self.stack.push(self.current.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.current = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.current.transform = self.current.transform.pre_translate(x, y);
    }

    fn rotate(&mut self, theta: f32) {
        self.current.transform = self
            .current
            .transform
            .pre_concat(Transform::from_rotate(theta.to_degrees()));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.current.transform = self.current.transform.pre_scale(sx, sy);
    }

    fn begin_path(&mut self) {
        self.builder.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.builder.close();
    }

    fn fill(&mut self) {
        let Some(path) = self.builder.clone().finish() else {
            return;
        };
        let paint = self.fill_paint();
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, self.current.transform, None);
    }

    fn stroke(&mut self) {
        let Some(path) = self.builder.clone().finish() else {
            return;
        };
        let paint = self.stroke_paint();
        let stroke = Stroke {
            width: self.current.line_width,
            line_cap: match self.current.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            dash: StrokeDash::new(self.current.dash.clone(), 0.0),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, self.current.transform, None);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let paint = self.fill_paint();
        self.pixmap
            .fill_rect(rect, &paint, self.current.transform, None);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        if text.is_empty() || self.current.fill_color.alpha() == 0.0 {
            return;
        }

        let font_size = self.current.font_size;
        let line_height = font_size * 1.15;
        let metrics = Metrics::new(font_size, line_height);
        let [r, g, b, a] = self.current.fill_color.to_rgba8();
        let text_align = self.current.text_align;
        let text_baseline = self.current.text_baseline;

        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut self.font_system);

        let attrs = Attrs::new().family(Family::Name(&self.current.font_family));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        // Measure the shaped runs to size the glyph scratch surface.
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        let mut first_baseline = metrics.line_height;
        for (index, run) in buffer.layout_runs().enumerate() {
            if let Some(last) = run.glyphs.last() {
                width = width.max(last.x + last.w);
            }
            if index == 0 {
                first_baseline = run.line_y;
            }
            height += metrics.line_height;
        }
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let Some(mut scratch) = Pixmap::new(width.ceil() as u32, height.ceil() as u32) else {
            warn!(text = text; "glyph scratch allocation failed, skipping text");
            return;
        };

        let mut glyph_paint = Paint::default();
        glyph_paint.anti_alias = false;
        buffer.draw(
            &mut self.swash_cache,
            cosmic_text::Color::rgba(r, g, b, a),
            |gx, gy, gw, gh, glyph_color| {
                if glyph_color.a() == 0 {
                    return;
                }
                let Some(rect) = Rect::from_xywh(gx as f32, gy as f32, gw as f32, gh as f32)
                else {
                    return;
                };
                glyph_paint.set_color_rgba8(
                    glyph_color.r(),
                    glyph_color.g(),
                    glyph_color.b(),
                    glyph_color.a(),
                );
                scratch.fill_rect(rect, &glyph_paint, Transform::identity(), None);
            },
        );

        let dx = match text_align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::Right => -width,
        };
        let dy = match text_baseline {
            TextBaseline::Alphabetic => -first_baseline,
            TextBaseline::Middle => -height / 2.0,
        };

        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = self.current.transform.pre_translate(x + dx, y + dy);
        self.pixmap
            .draw_pixmap(0, 0, scratch.as_ref(), &paint, transform, None);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.current.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.current.stroke_color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.current.line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.current.line_cap = cap;
    }

    fn set_line_dash(&mut self, pattern: &[f32]) {
        self.current.dash = pattern.to_vec();
    }

    fn set_font(&mut self, family: &str, size: f32) {
        self.current.font_family = family.to_string();
        self.current.font_size = size;
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.current.text_align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.current.text_baseline = baseline;
    }
}
