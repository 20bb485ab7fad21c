//! The taintlint command-line interface.
//!
//! This module is the entry point for the binary and orchestrates the core
//! library functions.

use crate::analysis::{Analyzer, Backend};
use crate::cli::args::{Format, TaintArgs};
use crate::error::AnalyzeError;
use crate::report;
use clap::{CommandFactory, Parser};
use std::{fs, path::Path, process};

pub mod args;

/// The main entry point for the CLI.
pub fn run() {
    let args = TaintArgs::parse();

    let file = match &args.file {
        Some(file) => file.clone(),
        None => {
            // No input is not an error: print usage and succeed.
            let mut cmd = TaintArgs::command();
            let _ = cmd.print_long_help();
            return;
        }
    };

    if let Err(e) = run_file(&args, &file) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run_file(args: &TaintArgs, path: &Path) -> Result<(), AnalyzeError> {
    let source = fs::read_to_string(path).map_err(|source| AnalyzeError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let backend = if args.fallback {
        Backend::Patterns
    } else {
        Backend::default()
    };
    let analysis = Analyzer::new()
        .with_backend(backend)
        .with_source_name(path.display().to_string())
        .analyze(&source);

    if args.tree {
        if let Some(tree) = &analysis.tree {
            println!("{}", tree.to_sexp());
            println!();
        }
    }

    let rendered = match args.format {
        Format::Text => analysis.report,
        Format::Context => report::render_context(&analysis.errors, &source),
        Format::Html => report::render_html(&analysis.errors, &source),
        Format::Json => report::render_json(&analysis.errors)?,
    };
    println!("{rendered}");

    Ok(())
}
