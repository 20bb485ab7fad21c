//! Fatal errors for the analysis entry points.
//!
//! Malformed DSL input is never fatal; it degrades into diagnostics. The
//! variants here cover the few failures that end an analysis outright.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("could not read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not serialize diagnostics: {0}")]
    Serialize(#[from] serde_json::Error),
}
