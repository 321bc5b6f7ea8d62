//! Class tokens and the style classifier.
//!
//! Every drawable element carries a whitespace separated class string
//! assigned by upstream layout (`"rung"`, `"open dashed"`, `"title center"`
//! and so on). Drivers never branch on raw class strings; they parse the
//! string once into [`ClassTokens`] and ask [`classify`] for a concrete
//! [`ResolvedStyle`], so all backends agree on what each class combination
//! looks like.

use std::fmt;

use indexmap::IndexSet;

use crate::{color::Color, props::RenderProps};

/// Defines how line endpoints are rendered.
///
/// Maps directly to SVG `stroke-linecap` attribute values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    /// Flat cap at the exact endpoint (SVG default)
    #[default]
    Butt,
    /// Rounded cap extending beyond the endpoint by half the stroke width
    Round,
    /// Square cap extending beyond the endpoint by half the stroke width
    Square,
}

impl LineCap {
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Horizontal text anchoring relative to the label's position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Text starts at the anchor point (SVG default)
    #[default]
    Left,
    /// Text is centered on the anchor point
    Center,
    /// Text ends at the anchor point
    Right,
}

impl TextAlign {
    /// Maps to the SVG `text-anchor` attribute.
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

/// Vertical text anchoring relative to the label's position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    /// The ordinary text baseline (surface default)
    #[default]
    Alphabetic,
    /// Vertically centered on the anchor point
    Middle,
}

impl TextBaseline {
    /// Maps to the SVG `dominant-baseline` attribute.
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Alphabetic => "alphabetic",
            Self::Middle => "central",
        }
    }
}

/// The dash patterns the classifier hands out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DashPattern {
    /// Continuous stroke
    #[default]
    Solid,
    /// Tight dashes used for block outlines
    Short,
    /// Wide dashes used for `dashed` line work
    Long,
}

impl DashPattern {
    /// On/off run lengths for raster surfaces. Empty means continuous.
    pub fn segments(self) -> &'static [f32] {
        match self {
            Self::Solid => &[],
            Self::Short => &[2.0, 1.0],
            Self::Long => &[6.0, 2.0],
        }
    }

    /// Maps to the SVG `stroke-dasharray` attribute.
    pub fn to_svg_value(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Short => Some("2,1"),
            Self::Long => Some("6,2"),
        }
    }
}

/// The parsed form of an element's class string.
///
/// Tokens keep their first-seen order and duplicates collapse, so the
/// round-trip back to an attribute string is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTokens {
    tokens: IndexSet<String>,
}

impl ClassTokens {
    /// Splits a raw class string on whitespace.
    pub fn parse(raw: &str) -> Self {
        Self {
            tokens: raw.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for ClassTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in &self.tokens {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{token}")?;
            first = false;
        }
        Ok(())
    }
}

impl From<&str> for ClassTokens {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Fully resolved drawing style for one path element.
///
/// `stroke`/`fill` of `None` disable that operation entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    stroke: Option<Color>,
    fill: Option<Color>,
    width: f32,
    dash: DashPattern,
    cap: LineCap,
}

impl ResolvedStyle {
    /// Stroke color, or `None` when the element is not stroked
    pub fn stroke(&self) -> Option<Color> {
        self.stroke
    }

    /// Fill color, or `None` when the element is not filled
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    /// Stroke width in logical pixels
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Dash pattern for the stroke
    pub fn dash(&self) -> DashPattern {
        self.dash
    }

    /// Line cap for the stroke
    pub fn cap(&self) -> LineCap {
        self.cap
    }
}

/// One row of the category table: a marker token and the style it selects.
struct Category {
    token: &'static str,
    resolve: fn(&RenderProps) -> ResolvedStyle,
}

/// Category precedence, highest first. The first token found in the class
/// list decides the base style; adding a category is one new row here.
const CATEGORIES: &[Category] = &[
    Category {
        token: "rung",
        resolve: rung,
    },
    Category {
        token: "block_tab",
        resolve: block_tab,
    },
    Category {
        token: "block",
        resolve: block,
    },
    Category {
        token: "closed",
        resolve: closed,
    },
    Category {
        token: "open",
        resolve: open,
    },
];

/// Resolves the drawing style for a path element.
///
/// The base style comes from the first matching category (or the plain-line
/// default). The `dashed` and `solid` modifier tokens then adjust the result
/// independently of which category matched.
pub fn classify(classes: &ClassTokens, props: &RenderProps) -> ResolvedStyle {
    let mut style = CATEGORIES
        .iter()
        .find(|category| classes.contains(category.token))
        .map(|category| (category.resolve)(props))
        .unwrap_or_else(|| line(props));

    if classes.contains("dashed") {
        style.dash = DashPattern::Long;
    }
    if classes.contains("solid") {
        style.cap = LineCap::Round;
    }

    style
}

/// Resolves the horizontal alignment for a label element.
pub fn label_align(classes: &ClassTokens) -> TextAlign {
    if classes.contains("end") {
        TextAlign::Right
    } else if classes.contains("center") || classes.contains("rung_label") {
        TextAlign::Center
    } else {
        TextAlign::Left
    }
}

fn line(props: &RenderProps) -> ResolvedStyle {
    ResolvedStyle {
        stroke: Some(props.line_color()),
        fill: None,
        width: props.line_width(),
        dash: DashPattern::Solid,
        cap: LineCap::Butt,
    }
}

fn rung(props: &RenderProps) -> ResolvedStyle {
    ResolvedStyle {
        stroke: Some(props.rung_color()),
        width: props.rung_width(),
        ..line(props)
    }
}

fn block_tab(props: &RenderProps) -> ResolvedStyle {
    ResolvedStyle {
        stroke: None,
        fill: Some(props.block_tab_fill()),
        ..line(props)
    }
}

fn block(props: &RenderProps) -> ResolvedStyle {
    ResolvedStyle {
        stroke: Some(props.block_stroke()),
        dash: DashPattern::Short,
        ..line(props)
    }
}

fn closed(props: &RenderProps) -> ResolvedStyle {
    ResolvedStyle {
        stroke: Some(props.arrow_color()),
        fill: Some(props.arrow_color()),
        ..line(props)
    }
}

fn open(props: &RenderProps) -> ResolvedStyle {
    ResolvedStyle {
        stroke: Some(props.arrow_color()),
        ..line(props)
    }
}
