//! The analysis entry points tying the pipeline together.
//!
//! One call runs `parse -> extract -> classify -> suggest -> render` over a
//! source string and hands back the diagnostics, the rendered report and the
//! tree. Every call is a pure transformation of its input; analyses of
//! independent sources can run from any number of threads.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::diagnostics::{diagnose, Diagnostic};
use crate::error::AnalyzeError;
use crate::fallback;
use crate::report::render_text;
use crate::syntax::{parse, ParseTree};

/// Probed once at first use, read-only afterwards: the grammar backend must
/// parse a trivial summary without errors to be considered usable.
static GRAMMAR_READY: Lazy<bool> = Lazy::new(|| !parse("{}").has_errors());

/// Whether the grammar-based parser can be used in this process.
pub fn parser_available() -> bool {
    *GRAMMAR_READY
}

/// Which checking strategy an [`Analyzer`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The error-tolerant parser plus tree extraction.
    Grammar,
    /// The line-oriented pattern heuristics; no tree.
    Patterns,
}

impl Default for Backend {
    fn default() -> Self {
        if parser_available() {
            Backend::Grammar
        } else {
            Backend::Patterns
        }
    }
}

/// The result of one analysis call.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Diagnostics in non-decreasing span-start order.
    pub errors: Vec<Diagnostic>,
    /// Plain-text report over the same diagnostics.
    pub report: String,
    /// The parse tree, when the grammar backend produced one.
    pub tree: Option<ParseTree>,
}

impl Analysis {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configured analysis runner.
#[derive(Debug, Clone)]
pub struct Analyzer {
    backend: Backend,
    source_name: String,
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer {
            backend: Backend::default(),
            source_name: "source".to_string(),
        }
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Name shown in reports, usually the input file path.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn analyze(&self, source: &str) -> Analysis {
        let (errors, tree) = match self.backend {
            Backend::Grammar => {
                let tree = parse(source);
                let errors = diagnose(&tree, &self.source_name);
                (errors, Some(tree))
            }
            Backend::Patterns => (fallback::check(source, &self.source_name), None),
        };
        let report = render_text(&errors, source, &self.source_name);
        Analysis { errors, report, tree }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyzes a source string with the default backend.
pub fn analyze(source: &str) -> Analysis {
    Analyzer::new().analyze(source)
}

/// Reads and analyzes a file. The only fatal condition in the pipeline is
/// the read failing; everything past it degrades into diagnostics.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<Analysis, AnalyzeError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| AnalyzeError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let analyzer = Analyzer::new().with_source_name(path.display().to_string());
    Ok(analyzer.analyze(&source))
}
