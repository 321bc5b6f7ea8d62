//! Weft - a rendering driver for pre-laid-out diagrams.
//!
//! Upstream tooling hands weft a [`Diagram`]: a flat list of labels, paths,
//! groups, and transformed scopes with all positions already computed. Weft
//! walks that list once per render and draws it onto the requested output
//! surface. Three surfaces ship out of the box: PNG (raster), SVG (vector
//! markup), and JSON (a structural dump of the draw sequence).
//!
//! # Examples
//!
//! ```
//! use weft::{DiagramBuilder, RenderOptions, render_svg_string};
//!
//! let diagram = DiagramBuilder::new(240.0, 120.0)
//!     .title("Handshake")
//!     .group("messages")
//!     .path("M 20 60 L 220 60", "open")
//!     .label(120.0, 52.0, "SYN", "center")
//!     .build();
//!
//! let svg = render_svg_string(&diagram, &RenderOptions::default())?;
//! assert!(svg.contains("<svg"));
//! # Ok::<(), weft::WeftError>(())
//! ```

pub mod canvas;
pub mod color;
pub mod diagram;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod path;
pub mod props;
pub mod style;

pub use canvas::{Canvas, PixmapCanvas, RecordingCanvas};
pub use color::Color;
pub use diagram::{Diagram, DiagramBuilder, PageMeta};
pub use driver::{CanvasDriver, Driver, GroupId, JsonDriver, SvgDriver};
pub use error::WeftError;
pub use geometry::{Point, Size};
pub use path::{PathData, TokenPolicy};
pub use props::{PropsPatch, RenderProps};
pub use style::ClassTokens;

use std::{fmt, io::Write, str::FromStr};

use log::info;

/// Options shared by every output backend.
///
/// The default renders at device scale 1 with no property overrides,
/// lenient path decoding, and the generator link enabled.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Device scale for raster output: surface pixels per logical pixel.
    pub scale: f32,
    /// Caller property overrides, applied over the diagram's own.
    pub props: PropsPatch,
    /// How unrecognized path tokens are treated.
    pub token_policy: TokenPolicy,
    /// Suppresses the generator link event and markup.
    pub no_link: bool,
    /// Extra CSS embedded in SVG output.
    pub css: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            props: PropsPatch::default(),
            token_policy: TokenPolicy::default(),
            no_link: false,
            css: None,
        }
    }
}

/// The output formats [`render`] can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Json,
    Png,
    Svg,
}

impl OutputKind {
    /// Every supported format, in the order they are listed to users.
    pub const ALL: [OutputKind; 3] = [OutputKind::Json, OutputKind::Png, OutputKind::Svg];

    /// The canonical lowercase name, which doubles as the file extension.
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl FromStr for OutputKind {
    type Err = WeftError;

    fn from_str(name: &str) -> Result<Self, WeftError> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            _ => Err(WeftError::UnsupportedOutput(name.to_string())),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True when `name` names a supported output format.
///
/// A probe for front ends that want to validate a format argument without
/// handling the parse error themselves.
pub fn supported(name: &str) -> bool {
    OutputKind::from_str(name).is_ok()
}

/// Renders a diagram to `out` in the requested format.
///
/// # Errors
///
/// Returns [`WeftError`] when the diagram carries malformed path data, the
/// surface cannot be prepared or encoded, or writing to `out` fails.
pub fn render<W: Write>(
    diagram: &Diagram,
    kind: OutputKind,
    options: &RenderOptions,
    out: &mut W,
) -> Result<(), WeftError> {
    info!(output = kind.name(), width = diagram.width(), height = diagram.height(); "rendering diagram");
    match kind {
        OutputKind::Json => {
            JsonDriver::new(diagram, out, options).draw()?;
        }
        OutputKind::Png => {
            let canvas = CanvasDriver::new(diagram, PixmapCanvas::new(), options).draw()?;
            out.write_all(&canvas.encode_png()?)?;
        }
        OutputKind::Svg => {
            SvgDriver::new(diagram, out, options).draw()?;
        }
    }
    Ok(())
}

/// Renders a diagram to an SVG string.
///
/// # Errors
///
/// Returns [`WeftError`] when rendering fails; see [`render`].
pub fn render_svg_string(diagram: &Diagram, options: &RenderOptions) -> Result<String, WeftError> {
    let mut out = Vec::new();
    SvgDriver::new(diagram, &mut out, options).draw()?;
    String::from_utf8(out).map_err(|err| WeftError::Surface(err.to_string()))
}

/// Renders a diagram onto a caller-supplied [`Canvas`] and hands the canvas
/// back, sized, cleared, and fully drawn.
///
/// This is the escape hatch for embedding: implement [`Canvas`] for your own
/// surface and weft drives it exactly as it drives its built-in PNG output.
///
/// # Errors
///
/// Returns [`WeftError`] when the diagram carries malformed path data.
pub fn render_to_canvas<C: Canvas>(
    diagram: &Diagram,
    canvas: C,
    options: &RenderOptions,
) -> Result<C, WeftError> {
    CanvasDriver::new(diagram, canvas, options).draw()
}
