pub use crate::analysis::{analyze, analyze_file, parser_available, Analysis, Analyzer, Backend};
pub use crate::diagnostics::{diagnose, Diagnostic, SourceArc};
pub use crate::error::AnalyzeError;
pub use crate::summary::{Key, Operation, SideEffect, TaintSummary};
pub use crate::syntax::{parse, ErrorKind, NodeId, NodeKind, ParseNode, ParseTree, Pos, Span};

pub mod analysis;
pub mod cli;
pub mod diagnostics;
pub mod error;
pub mod fallback;
pub mod report;
pub mod suggest;
pub mod summary;
pub mod syntax;
