//! The raster backend: renders through the [`Canvas`] surface contract.

use log::debug;

use crate::{
    RenderOptions,
    canvas::Canvas,
    diagram::{self, Diagram},
    driver::Driver,
    error::WeftError,
    geometry::Point,
    path::{self, PathCommand, PathData, TokenPolicy},
    props::RenderProps,
    style::{self, ClassTokens, TextBaseline},
};

/// Renders a diagram onto any [`Canvas`] surface.
///
/// `draw` sizes the surface to the diagram bounds times the device-scale
/// option (display size stays logical, so visual size is scale independent),
/// clears it with the background property, walks the diagram, and returns
/// the canvas for the caller to encode or inspect.
pub struct CanvasDriver<'d, C> {
    diagram: &'d Diagram,
    canvas: C,
    props: RenderProps,
    scale: f32,
    policy: TokenPolicy,
}

impl<'d, C: Canvas> CanvasDriver<'d, C> {
    pub fn new(diagram: &'d Diagram, canvas: C, options: &RenderOptions) -> Self {
        Self {
            diagram,
            canvas,
            props: RenderProps::resolve(diagram.props(), &options.props),
            scale: options.scale,
            policy: options.token_policy,
        }
    }
}

impl<C: Canvas> Driver for CanvasDriver<'_, C> {
    type Target = C;

    fn draw(mut self) -> Result<C, WeftError> {
        let size = self.diagram.size();
        let scale = self.scale;
        debug!(width = size.width(), height = size.height(), scale = scale; "sizing raster surface");

        let device = size.scale(scale);
        self.canvas
            .set_surface_size(device.width().ceil() as u32, device.height().ceil() as u32);
        self.canvas.set_display_size(size.width(), size.height());
        if scale != 1.0 {
            self.canvas.scale(scale, scale);
        }
        self.canvas.set_fill_color(self.props.background());
        self.canvas.fill_rect(0.0, 0.0, size.width(), size.height());

        diagram::traverse(self.diagram, &mut self)?;
        Ok(self.canvas)
    }

    fn transform<F>(&mut self, x: f32, y: f32, theta: f32, body: F) -> Result<(), WeftError>
    where
        F: FnOnce(&mut Self) -> Result<(), WeftError>,
    {
        self.canvas.save();
        if x != 0.0 || y != 0.0 {
            self.canvas.translate(x, y);
        }
        if theta != 0.0 {
            self.canvas.rotate(theta);
        }
        let result = body(self);
        self.canvas.restore();
        result
    }

    fn draw_label(
        &mut self,
        at: Point,
        text: &str,
        classes: &ClassTokens,
        angle: Option<f32>,
    ) -> Result<(), WeftError> {
        if text.is_empty() {
            return Ok(());
        }

        self.canvas.save();
        self.canvas
            .set_font(self.props.font(), self.props.text_size());
        self.canvas.set_fill_color(self.props.text_color());
        self.canvas.set_text_align(style::label_align(classes));
        self.canvas.set_text_baseline(TextBaseline::Middle);

        let angle = angle.unwrap_or(0.0);
        if angle != 0.0 {
            self.canvas.translate(at.x(), at.y());
            self.canvas.rotate(Point::radians_from_degrees(angle));
            self.canvas.fill_text(text, 0.0, 0.0);
        } else {
            self.canvas.fill_text(text, at.x(), at.y());
        }
        self.canvas.restore();
        Ok(())
    }

    fn draw_path(&mut self, data: &PathData, classes: &ClassTokens) -> Result<(), WeftError> {
        if data.is_empty() {
            return Ok(());
        }
        let commands = path::decode(data, self.policy)?;
        let style = style::classify(classes, &self.props);

        self.canvas.save();
        self.canvas.begin_path();
        self.canvas.set_line_width(style.width());
        self.canvas.set_line_cap(style.cap());
        self.canvas.set_line_dash(style.dash().segments());
        for command in &commands {
            match command {
                PathCommand::MoveTo(point) => self.canvas.move_to(point.x(), point.y()),
                PathCommand::LineTo(point) => self.canvas.line_to(point.x(), point.y()),
                PathCommand::Close => self.canvas.close_path(),
            }
        }
        if let Some(fill) = style.fill() {
            self.canvas.set_fill_color(fill);
            self.canvas.fill();
        }
        if let Some(stroke) = style.stroke() {
            self.canvas.set_stroke_color(stroke);
            self.canvas.stroke();
        }
        self.canvas.restore();
        Ok(())
    }
}
