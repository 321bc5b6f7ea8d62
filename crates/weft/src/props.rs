//! Render properties: the visual defaults every driver consults.
//!
//! Properties resolve in three layers: built-in defaults first, then the
//! patch carried by the diagram itself, then the caller's patch from
//! [`RenderOptions`](crate::RenderOptions). The resolved bundle is immutable
//! for the duration of a render, which is what makes repeated renders of the
//! same diagram deterministic.

use serde::{Deserialize, Serialize};

use crate::{color::Color, error::WeftError};

/// Resolved visual defaults for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProps {
    background: Color,
    text_color: Color,
    text_size: f32,
    font: String,
    line_color: Color,
    line_width: f32,
    rung_color: Color,
    rung_width: f32,
    arrow_color: Color,
    block_stroke: Color,
    block_tab_fill: Color,
}

impl RenderProps {
    /// Resolves the final property bundle from the diagram's patch and the
    /// caller's patch, in that order of increasing precedence.
    pub fn resolve(diagram: &PropsPatch, options: &PropsPatch) -> Self {
        let mut props = Self::default();
        props.apply(diagram);
        props.apply(options);
        props
    }

    fn apply(&mut self, patch: &PropsPatch) {
        if let Some(color) = patch.background {
            self.background = color;
        }
        if let Some(color) = patch.text_color {
            self.text_color = color;
        }
        if let Some(size) = patch.text_size {
            self.text_size = size;
        }
        if let Some(font) = &patch.font {
            self.font = font.clone();
        }
        if let Some(color) = patch.line_color {
            self.line_color = color;
        }
        if let Some(width) = patch.line_width {
            self.line_width = width;
        }
        if let Some(color) = patch.rung_color {
            self.rung_color = color;
        }
        if let Some(width) = patch.rung_width {
            self.rung_width = width;
        }
        if let Some(color) = patch.arrow_color {
            self.arrow_color = color;
        }
        if let Some(color) = patch.block_stroke {
            self.block_stroke = color;
        }
        if let Some(color) = patch.block_tab_fill {
            self.block_tab_fill = color;
        }
    }

    /// Background color the whole surface is cleared with
    pub fn background(&self) -> Color {
        self.background
    }

    /// Label text color
    pub fn text_color(&self) -> Color {
        self.text_color
    }

    /// Label text size in logical pixels
    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    /// Label font family
    pub fn font(&self) -> &str {
        &self.font
    }

    /// Default stroke color for uncategorized line work
    pub fn line_color(&self) -> Color {
        self.line_color
    }

    /// Default stroke width for line work
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Stroke color for lifeline rungs
    pub fn rung_color(&self) -> Color {
        self.rung_color
    }

    /// Stroke width for lifeline rungs
    pub fn rung_width(&self) -> f32 {
        self.rung_width
    }

    /// Color for arrowheads, both outline and filled
    pub fn arrow_color(&self) -> Color {
        self.arrow_color
    }

    /// Stroke color for block outlines
    pub fn block_stroke(&self) -> Color {
        self.block_stroke
    }

    /// Fill color for block header tabs
    pub fn block_tab_fill(&self) -> Color {
        self.block_tab_fill
    }
}

impl Default for RenderProps {
    fn default() -> Self {
        Self {
            background: css("white"),
            text_color: css("black"),
            text_size: 13.0,
            font: "Helvetica".to_string(),
            line_color: css("black"),
            line_width: 1.0,
            rung_color: css("black"),
            rung_width: 1.0,
            arrow_color: css("black"),
            block_stroke: css("gray"),
            block_tab_fill: css("lightgray"),
        }
    }
}

fn css(name: &str) -> Color {
    Color::new(name).expect("built-in default colors are valid CSS")
}

/// A partial property override.
///
/// Diagrams embed one of these, callers supply another, and the CLI builds
/// one from repeated `key=value` flags. Unset fields inherit from the layer
/// below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rung_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rung_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_stroke: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_tab_fill: Option<Color>,
}

impl PropsPatch {
    /// Builds a patch from `key=value` override strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use weft::props::PropsPatch;
    ///
    /// let patch = PropsPatch::from_overrides(["background=#222", "text_size=16"]).unwrap();
    /// assert!(patch.background.is_some());
    /// assert_eq!(patch.text_size, Some(16.0));
    /// ```
    pub fn from_overrides<'a, I>(pairs: I) -> Result<Self, WeftError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut patch = Self::default();
        for pair in pairs {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(WeftError::Property {
                    key: pair.to_string(),
                    reason: "expected `key=value`".to_string(),
                });
            };
            patch.set(key.trim(), value.trim())?;
        }
        Ok(patch)
    }

    /// Sets a single property from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), WeftError> {
        match key {
            "background" => self.background = Some(parse_color(key, value)?),
            "text_color" => self.text_color = Some(parse_color(key, value)?),
            "text_size" => self.text_size = Some(parse_width(key, value)?),
            "font" => self.font = Some(value.to_string()),
            "line_color" => self.line_color = Some(parse_color(key, value)?),
            "line_width" => self.line_width = Some(parse_width(key, value)?),
            "rung_color" => self.rung_color = Some(parse_color(key, value)?),
            "rung_width" => self.rung_width = Some(parse_width(key, value)?),
            "arrow_color" => self.arrow_color = Some(parse_color(key, value)?),
            "block_stroke" => self.block_stroke = Some(parse_color(key, value)?),
            "block_tab_fill" => self.block_tab_fill = Some(parse_color(key, value)?),
            unknown => {
                return Err(WeftError::Property {
                    key: unknown.to_string(),
                    reason: "unknown property".to_string(),
                });
            }
        }
        Ok(())
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_color(key: &str, value: &str) -> Result<Color, WeftError> {
    Color::new(value).map_err(|reason| WeftError::Property {
        key: key.to_string(),
        reason,
    })
}

fn parse_width(key: &str, value: &str) -> Result<f32, WeftError> {
    match value.parse::<f32>() {
        Ok(number) if number.is_finite() && number > 0.0 => Ok(number),
        _ => Err(WeftError::Property {
            key: key.to_string(),
            reason: format!("expected a positive number, got `{value}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_props() {
        let props = RenderProps::default();
        assert_eq!(props.background().to_string(), "white");
        assert_eq!(props.text_color().to_string(), "black");
        assert_eq!(props.text_size(), 13.0);
        assert_eq!(props.font(), "Helvetica");
        assert_eq!(props.line_width(), 1.0);
        assert_eq!(props.rung_width(), 1.0);
    }

    #[test]
    fn test_resolve_precedence() {
        let diagram = PropsPatch {
            background: Some(Color::new("red").unwrap()),
            text_size: Some(10.0),
            ..Default::default()
        };
        let options = PropsPatch {
            background: Some(Color::new("blue").unwrap()),
            ..Default::default()
        };

        let props = RenderProps::resolve(&diagram, &options);
        // Caller overrides the diagram; the diagram overrides defaults.
        assert_eq!(props.background().to_string(), "blue");
        assert_eq!(props.text_size(), 10.0);
        assert_eq!(props.font(), "Helvetica");
    }

    #[test]
    fn test_set_color_and_width() {
        let mut patch = PropsPatch::default();
        patch.set("rung_color", "#ff0000").unwrap();
        patch.set("rung_width", "2.5").unwrap();
        assert_eq!(patch.rung_color, Some(Color::new("#ff0000").unwrap()));
        assert_eq!(patch.rung_width, Some(2.5));
    }

    #[test]
    fn test_set_unknown_key() {
        let mut patch = PropsPatch::default();
        let err = patch.set("backgroud", "white").unwrap_err();
        match err {
            WeftError::Property { key, .. } => assert_eq!(key, "backgroud"),
            other => panic!("expected Property error, got {other:?}"),
        }
    }

    #[test]
    fn test_set_invalid_color() {
        let mut patch = PropsPatch::default();
        assert!(patch.set("background", "not-a-color").is_err());
    }

    #[test]
    fn test_set_invalid_width() {
        let mut patch = PropsPatch::default();
        assert!(patch.set("line_width", "fat").is_err());
        assert!(patch.set("line_width", "-1").is_err());
        assert!(patch.set("line_width", "0").is_err());
    }

    #[test]
    fn test_from_overrides() {
        let patch =
            PropsPatch::from_overrides(["font=Courier", "block_tab_fill=#eee"]).unwrap();
        assert_eq!(patch.font.as_deref(), Some("Courier"));
        assert!(patch.block_tab_fill.is_some());

        assert!(PropsPatch::from_overrides(["no-equals-sign"]).is_err());
    }

    #[test]
    fn test_patch_serde_partial() {
        let patch: PropsPatch =
            serde_json::from_str(r##"{"background": "#123456", "text_size": 15.0}"##).unwrap();
        assert!(patch.background.is_some());
        assert_eq!(patch.text_size, Some(15.0));
        assert!(patch.font.is_none());

        let empty: PropsPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
