//! Color handling for diagram rendering.
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, providing the conversions the rendering drivers need:
//! CSS string parsing for property values, serde round-tripping in diagram
//! JSON, SVG attribute values, and 8-bit RGBA for raster paints.

use std::str::FromStr;

use color::{DynamicColor, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wrapper around the `DynamicColor` type from the color crate.
///
/// Render properties carry their colors as this type; drivers convert to
/// whatever their surface wants at draw time.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use weft::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    ///
    /// The value is between 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Converts this color to 8-bit sRGB components, `[r, g, b, a]`.
    ///
    /// Raster paints want concrete bytes rather than CSS strings.
    pub fn to_rgba8(self) -> [u8; 4] {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        [rgba.r, rgba.g, rgba.b, rgba.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

// Render properties and diagram JSON carry colors as CSS strings
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::new(&raw).map_err(serde::de::Error::custom)
    }
}
