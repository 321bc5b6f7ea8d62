//! Command-line argument definitions for the weft CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the output format,
//! render options, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the weft diagram renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram JSON file
    #[arg(help = "Path to the input diagram file")]
    pub input: String,

    /// Path to the output file; its extension picks the format
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Output format (json, png, svg), overriding the file extension
    #[arg(short, long)]
    pub format: Option<String>,

    /// Device scale for raster output
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Render property override as key=value; repeatable
    #[arg(short = 'p', long = "property")]
    pub properties: Vec<String>,

    /// Reject unrecognized path tokens instead of skipping them
    #[arg(long)]
    pub strict_paths: bool,

    /// Leave the generator link out of the output
    #[arg(long)]
    pub no_link: bool,

    /// Path to a CSS file to embed in SVG output
    #[arg(long)]
    pub css: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
