//! Error types for rendering operations.
//!
//! This module provides the main error type [`WeftError`] which wraps the
//! error conditions that can occur while driving a diagram onto an output
//! surface.

use std::io;

use thiserror::Error;

use crate::path::PathError;

/// The main error type for rendering operations.
///
/// Path problems keep their structured form (see [`PathError`]); when a
/// drawing hook fails mid-traversal the error is wrapped in [`Element`]
/// with the depth-first ordinal of the element that produced it.
///
/// [`Element`]: WeftError::Element
#[derive(Debug, Error)]
pub enum WeftError {
    #[error("Invalid output type: \"{0}\" (expected one of: json, png, svg)")]
    UnsupportedOutput(String),

    #[error("Malformed path: {0}")]
    Path(#[from] PathError),

    #[error("Element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<WeftError>,
    },

    #[error("Invalid property `{key}`: {reason}")]
    Property { key: String, reason: String },

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WeftError {
    /// Attaches the ordinal of the offending element.
    ///
    /// The innermost wrap wins: ordinals are assigned depth-first across the
    /// whole diagram, so an error that already carries one is left alone as
    /// it bubbles out of nested scopes.
    pub(crate) fn at_element(self, index: usize) -> Self {
        match self {
            err @ Self::Element { .. } => err,
            err => Self::Element {
                index,
                source: Box::new(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_output_lists_valid_kinds() {
        let err = WeftError::UnsupportedOutput("svg2".to_string());
        let msg = err.to_string();
        assert!(msg.contains("\"svg2\""));
        assert!(msg.contains("json"));
        assert!(msg.contains("png"));
        assert!(msg.contains("svg"));
    }

    #[test]
    fn test_at_element_keeps_innermost_ordinal() {
        let err = WeftError::Surface("out of bounds".to_string());
        let wrapped = err.at_element(3).at_element(7);
        match wrapped {
            WeftError::Element { index, .. } => assert_eq!(index, 3),
            other => panic!("expected Element wrap, got {other:?}"),
        }
    }
}
