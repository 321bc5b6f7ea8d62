use std::f32::consts::PI;

/// A position in diagram space, in logical pixels.
///
/// The coordinate system matches the usual 2D raster convention: x grows to
/// the right, y grows downward, with the origin in the top-left corner of
/// the diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Converts an angle in degrees to radians.
    ///
    /// Label rotation angles travel through the pipeline in degrees; raster
    /// surfaces rotate in radians, so drivers convert at the boundary.
    pub fn radians_from_degrees(degrees: f32) -> f32 {
        degrees * (PI / 180.0)
    }
}

/// Represents the dimensions of a drawing area with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Multiplies both dimensions by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}
