//! Error type for the CLI layer.

use std::io;

use thiserror::Error;

use weft::WeftError;

/// Failure modes the CLI adds on top of rendering itself, mostly file
/// handling with the offending path attached.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read `{path}`: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot write `{path}`: {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot infer an output format from `{path}`; pass --format")]
    UnknownFormat { path: String },

    #[error("device scale must be a positive number, got {0}")]
    InvalidScale(f32),

    #[error(transparent)]
    Render(#[from] WeftError),
}
