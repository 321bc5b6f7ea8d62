//! The rendering contract every backend implements.
//!
//! [`diagram::traverse`](crate::diagram::traverse) speaks only this trait, so
//! identical rendering logic drives every output surface. Three backends
//! ship: [`CanvasDriver`] (raster, over any [`Canvas`](crate::canvas::Canvas)),
//! [`SvgDriver`] (vector markup), and [`JsonDriver`] (structural dump). A
//! driver instance is created with a diagram and a target, used for exactly
//! one [`draw`](Driver::draw), and discarded.

pub mod canvas;
pub mod json;
pub mod svg;

pub use self::canvas::CanvasDriver;
pub use self::json::JsonDriver;
pub use self::svg::SvgDriver;

use crate::{
    diagram::PageMeta, error::WeftError, geometry::Point, path::PathData, style::ClassTokens,
};

/// Opaque handle for a logical group opened by [`Driver::draw_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

impl GroupId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the group in document order, starting at zero.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One rendering backend.
///
/// Hooks that mutate target style state must leave that state as they found
/// it before returning; sibling hook calls never observe leaked style,
/// transform, or font changes.
pub trait Driver {
    /// What [`draw`](Driver::draw) yields when the render completes.
    type Target;

    /// Renders the whole diagram: sizes and clears the target, walks every
    /// element, and returns the finished target.
    fn draw(self) -> Result<Self::Target, WeftError>;

    /// Document metadata, delivered before any element. No effect by
    /// default; markup backends emit titles from it.
    fn meta(&mut self, _meta: &PageMeta) -> Result<(), WeftError> {
        Ok(())
    }

    /// Generator attribution, delivered after the last element. No effect
    /// by default.
    fn home_link(&mut self, _meta: &PageMeta) -> Result<(), WeftError> {
        Ok(())
    }

    /// Opens a named logical group for the draws that follow. Backends
    /// without a grouping concept return `None` and do nothing.
    fn draw_group(&mut self, _name: &str) -> Result<Option<GroupId>, WeftError> {
        Ok(None)
    }

    /// Runs `body` inside a local frame translated by `(x, y)` and rotated
    /// by `theta` radians. The previous frame is restored before this
    /// returns, whether `body` succeeded or failed; zero components skip
    /// the corresponding target operation.
    fn transform<F>(&mut self, x: f32, y: f32, theta: f32, body: F) -> Result<(), WeftError>
    where
        F: FnOnce(&mut Self) -> Result<(), WeftError>,
        Self: Sized;

    /// Draws one line of text anchored at `at`. Horizontal alignment comes
    /// from the class tokens, rotation from `angle` in degrees around the
    /// anchor. Empty text is a complete no-op.
    fn draw_label(
        &mut self,
        at: Point,
        text: &str,
        classes: &ClassTokens,
        angle: Option<f32>,
    ) -> Result<(), WeftError>;

    /// Decodes `data` and draws it styled by the class tokens, filling
    /// before stroking when the style asks for both. Empty data is a
    /// complete no-op.
    fn draw_path(&mut self, data: &PathData, classes: &ClassTokens) -> Result<(), WeftError>;
}
