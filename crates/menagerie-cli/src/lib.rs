//! CLI logic for the Menagerie model assembler.
//!
//! Reads a syntax bundle, assembles it and writes the model outline.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use menagerie::{MenagerieError, ModelBuilder, SyntaxBundle};

use error_adapter::{DiagnosticAdapter, render};

/// Run the Menagerie CLI application
///
/// Assembles the input bundle and writes the outline of the resulting model
/// to the output file, or to stdout when no output is given. Diagnostics
/// that did not stop assembly are logged as warnings.
///
/// # Errors
///
/// Returns `MenagerieError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed syntax bundles
/// - Assembly failures
pub fn run(args: &Args) -> Result<(), MenagerieError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing bundle"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let bundle: SyntaxBundle =
        toml::from_str(&source).map_err(|err| MenagerieError::Bundle(err.to_string()))?;

    let builder = ModelBuilder::new(app_config);
    let assembled = builder.assemble(&bundle)?;
    for diagnostic in assembled.diagnostics() {
        warn!("{}", render(&DiagnosticAdapter::new(diagnostic)));
    }

    let outline = builder.outline(assembled.model());
    match &args.output {
        Some(output) => {
            fs::write(output, outline)?;
            info!(output_file = output.as_str(); "Outline written");
        }
        None => print!("{outline}"),
    }

    Ok(())
}
