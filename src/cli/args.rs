//! Defines the command-line arguments for the taintlint CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "taintlint",
    version,
    about = "Syntax checker and diagnostics reporter for taint-summary files."
)]
pub struct TaintArgs {
    /// Path to the taint-summary file to analyze.
    pub file: Option<PathBuf>,

    /// Report format to print.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Also print the parse tree before the report.
    #[arg(long)]
    pub tree: bool,

    /// Use the line-oriented pattern checks instead of the parser.
    #[arg(long)]
    pub fallback: bool,
}

/// Output formats for the diagnostics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Plain-text report with one block per diagnostic.
    Text,
    /// Like text, with a line of context around each diagnostic.
    Context,
    /// HTML fragment for embedding.
    Html,
    /// Pretty-printed JSON array.
    Json,
}
