//! CLI logic for the weft diagram renderer.
//!
//! Reads a laid-out diagram in its JSON interchange form and renders it to
//! PNG, SVG, or a JSON draw-event dump.

mod args;
mod error;

pub use args::Args;
pub use error::CliError;

use std::{fs, path::Path, str::FromStr};

use log::info;

use weft::{Diagram, OutputKind, PropsPatch, RenderOptions, TokenPolicy};

/// Run the weft CLI application
///
/// Reads the input diagram, renders it in the requested format, and writes
/// the result to the output file.
///
/// # Errors
///
/// Returns [`CliError`] for file I/O problems, an unrecognizable output
/// format, invalid options, or rendering failures.
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    // Bad output formats and options fail before the input is even read.
    let kind = output_kind(args)?;
    let options = render_options(args)?;

    let source = fs::read_to_string(&args.input).map_err(|source| CliError::ReadInput {
        path: args.input.clone(),
        source,
    })?;
    let diagram = Diagram::from_json(&source)?;

    let mut rendered = Vec::new();
    weft::render(&diagram, kind, &options, &mut rendered)?;

    fs::write(&args.output, &rendered).map_err(|source| CliError::WriteOutput {
        path: args.output.clone(),
        source,
    })?;

    info!(output_file = args.output, bytes = rendered.len(); "Diagram exported successfully");
    Ok(())
}

/// Picks the output format: an explicit `--format` wins, otherwise the
/// output file extension decides.
fn output_kind(args: &Args) -> Result<OutputKind, CliError> {
    if let Some(format) = args.format.as_deref() {
        return Ok(OutputKind::from_str(format)?);
    }
    match Path::new(&args.output).extension().and_then(|ext| ext.to_str()) {
        Some(extension) => Ok(OutputKind::from_str(extension)?),
        None => Err(CliError::UnknownFormat {
            path: args.output.clone(),
        }),
    }
}

/// Assembles [`RenderOptions`] from the parsed arguments.
fn render_options(args: &Args) -> Result<RenderOptions, CliError> {
    if !args.scale.is_finite() || args.scale <= 0.0 {
        return Err(CliError::InvalidScale(args.scale));
    }

    let props = PropsPatch::from_overrides(args.properties.iter().map(String::as_str))
        .map_err(CliError::Render)?;

    let css = match args.css.as_deref() {
        Some(path) => Some(fs::read_to_string(path).map_err(|source| CliError::ReadInput {
            path: path.to_string(),
            source,
        })?),
        None => None,
    };

    Ok(RenderOptions {
        scale: args.scale,
        props,
        token_policy: if args.strict_paths {
            TokenPolicy::Strict
        } else {
            TokenPolicy::Lenient
        },
        no_link: args.no_link,
        css,
    })
}
