//! Diagnostics derived from parse trees.
//!
//! The parser never fails; everything it cannot understand becomes an error
//! node in the tree. This module walks a finished tree, turns each error node
//! into a [`Diagnostic`] carrying a message, the source text under the span
//! and a fix suggestion, and implements [`miette::Diagnostic`] on the result
//! so any miette report handler can render it.

use std::fmt;
use std::sync::Arc;

use miette::{LabeledSpan, NamedSource, SourceCode};
use serde::Serialize;

use crate::suggest;
use crate::syntax::{ErrorKind, NodeKind, ParseTree, Span};

/// Shared handle to a named source text. Every diagnostic holds one so it
/// stays renderable on its own after the tree is gone.
pub type SourceArc = Arc<NamedSource<String>>;

/// Wraps a source string as a named miette source for reports.
pub fn to_error_source(name: impl AsRef<str>, content: impl Into<String>) -> SourceArc {
    Arc::new(NamedSource::new(name, content.into()))
}

/// A single problem found in a taint summary.
///
/// Plain data first: the error class, where it sits in the source, the text
/// under the span, a human message and an optional fix. Equality ignores the
/// shared source handle, so two analyses of the same text compare equal
/// field-for-field.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub span: Span,
    /// Text under the span; empty for zero-width spans.
    pub snippet: String,
    pub message: String,
    pub suggestion: Option<String>,
    #[serde(skip)]
    phase: &'static str,
    #[serde(skip)]
    source: SourceArc,
}

impl Diagnostic {
    fn new(
        phase: &'static str,
        kind: ErrorKind,
        span: Span,
        snippet: String,
        source: SourceArc,
    ) -> Self {
        let message = message_for(kind, &snippet);
        let suggestion = Some(suggest::for_kind(kind, &snippet));
        Diagnostic { kind, span, snippet, message, suggestion, phase, source }
    }

    /// Diagnostic extracted from a parse-tree error node.
    pub(crate) fn from_tree_node(
        kind: ErrorKind,
        span: Span,
        snippet: String,
        source: SourceArc,
    ) -> Self {
        Self::new("syntax", kind, span, snippet, source)
    }

    /// Diagnostic produced by the line-oriented fallback scan.
    pub(crate) fn from_scan(
        kind: ErrorKind,
        span: Span,
        snippet: String,
        source: SourceArc,
    ) -> Self {
        Self::new("scan", kind, span, snippet, source)
    }

    /// 1-based `(line, column)` of the span start, for display.
    pub fn display_position(&self) -> (usize, usize) {
        self.span.display_position()
    }

    /// Clamps the span to the source text so the rendered label always sits
    /// on real characters. A zero-width span marks the character at (or, at
    /// end of input, before) its position.
    fn label_range(&self) -> (usize, usize) {
        let text = self.source.inner().as_str();
        if text.is_empty() {
            return (0, 0);
        }
        let mut start = self.span.start.byte;
        if start >= text.len() {
            start = text.len() - 1;
        }
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = self.span.end.byte.min(text.len());
        while end < text.len() && !text.is_char_boundary(end) {
            end += 1;
        }
        if end <= start {
            end = match text[start..].chars().next() {
                Some(c) => start + c.len_utf8(),
                None => text.len(),
            };
        }
        (start, end - start)
    }
}

impl PartialEq for Diagnostic {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.span == other.span
            && self.snippet == other.snippet
            && self.message == other.message
            && self.suggestion == other.suggestion
    }
}

impl Eq for Diagnostic {}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "taintlint::{}::{}",
            self.phase,
            self.kind.code_suffix()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.suggestion
            .as_ref()
            .map(|s| Box::new(s) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (offset, len) = self.label_range();
        let label = LabeledSpan::new(Some(self.kind.label().to_string()), offset, len);
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&*self.source)
    }
}

/// The human message for an error node of `kind`. One fixed template per
/// kind; the single exception is `UnknownOperation`, which interpolates the
/// captured name `text`. The offending text of every other kind reaches the
/// reader through the diagnostic's snippet and span instead.
pub fn message_for(kind: ErrorKind, text: &str) -> String {
    match kind {
        ErrorKind::MissingClosingBrace => {
            "missing closing brace \"}\" at the end of the summary".to_string()
        }
        ErrorKind::MissingComma => "missing comma \",\" between operations".to_string(),
        ErrorKind::MissingOpenParen => {
            "missing opening parenthesis \"(\" after the operation name".to_string()
        }
        ErrorKind::MissingCloseParen => "missing closing parenthesis \")\"".to_string(),
        ErrorKind::UnknownOperation => format!(
            "unknown operation \"{text}\"; available operations are: setSink, transitive, sanitize, swapTaint"
        ),
        ErrorKind::NumberTooLarge => "key is too large; keys run from <-1> to <9>".to_string(),
        ErrorKind::NumberTooSmall => "key is too small; keys run from <-1> to <9>".to_string(),
        ErrorKind::NonIntegerNumber => "key is not an integer".to_string(),
        ErrorKind::InvalidNumberChar => "invalid key or stray text".to_string(),
        ErrorKind::MisplacedParenOpen => "misplaced opening parenthesis \"(\"".to_string(),
        ErrorKind::MisplacedParenClose => "misplaced closing parenthesis \")\"".to_string(),
        ErrorKind::MisplacedComma => "misplaced comma \",\"".to_string(),
    }
}

/// Walks `tree` in document order and produces one diagnostic per error
/// node. The result is ordered by span start and is empty exactly when the
/// tree has no error nodes.
pub fn diagnose(tree: &ParseTree, source_name: &str) -> Vec<Diagnostic> {
    let source = to_error_source(source_name, tree.source());
    tree.preorder()
        .filter_map(|id| {
            let node = tree.node(id);
            match node.kind {
                NodeKind::Error(kind) => {
                    let snippet = tree.text_of(id).to_string();
                    Some(Diagnostic::from_tree_node(
                        kind,
                        node.span,
                        snippet,
                        Arc::clone(&source),
                    ))
                }
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;
    use crate::syntax::parse;

    fn diagnostics(src: &str) -> Vec<Diagnostic> {
        diagnose(&parse(src), "test.tsum")
    }

    #[test]
    fn well_formed_summary_has_no_diagnostics() {
        assert!(diagnostics("{setSink(<0>), transitive(<1>,<2>)}").is_empty());
    }

    #[test]
    fn error_sources_take_borrowed_and_owned_names() {
        let borrowed = to_error_source("case.tsum", "{}");
        let owned = to_error_source(String::from("case.tsum"), "{}");
        assert_eq!(borrowed.name(), "case.tsum");
        assert_eq!(owned.name(), borrowed.name());
    }

    #[test]
    fn unknown_operation_carries_text_and_candidate() {
        let diags = diagnostics("{transitiv(<1>,<2>)}");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::UnknownOperation);
        assert_eq!(diags[0].snippet, "transitiv");
        assert!(diags[0].message.contains("\"transitiv\""));
        assert_eq!(diags[0].suggestion.as_deref(), Some("transitive"));
    }

    #[test]
    fn diagnostics_are_ordered_by_span_start() {
        let diags = diagnostics("{setSink(<1>,<2>), transitiv(<3>}");
        assert!(diags.len() >= 2);
        for pair in diags.windows(2) {
            assert!(pair[0].span.start.byte <= pair[1].span.start.byte);
        }
    }

    #[test]
    fn extraction_is_idempotent() {
        let src = "{setSink(<10>) sanitize(<2.5>)";
        assert_eq!(diagnostics(src), diagnostics(src));
    }

    #[test]
    fn equality_ignores_the_source_handle() {
        let a = diagnostics("{setSink}");
        let b = diagnose(&parse("{setSink}"), "other-name.tsum");
        assert_eq!(a, b);
    }

    #[test]
    fn every_diagnostic_count_matches_tree_error_count() {
        for src in ["{", "{transitiv}", "{setSink(<1>,<2>)}", "junk"] {
            let tree = parse(src);
            let errors = tree
                .preorder()
                .filter(|&id| tree.node(id).kind.is_error())
                .count();
            assert_eq!(diagnose(&tree, "s").len(), errors, "mismatch for {src:?}");
        }
    }

    #[test]
    fn key_messages_are_fixed_templates() {
        let large = diagnostics("{setSink(<10>)}");
        assert_eq!(large[0].message, "key is too large; keys run from <-1> to <9>");
        assert_eq!(large[0].snippet, "10");
        assert_eq!(large[0].message, diagnostics("{setSink(<99>)}")[0].message);

        let frac = diagnostics("{sanitize(<2.5>)}");
        assert_eq!(frac[0].message, "key is not an integer");
        assert!(!frac[0].message.contains("2.5"));
    }

    #[test]
    fn only_unknown_operation_messages_vary_with_the_text() {
        for kind in ErrorKind::ALL {
            let a = message_for(kind, "aaaa");
            let b = message_for(kind, "bbbb");
            if kind == ErrorKind::UnknownOperation {
                assert_ne!(a, b);
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn miette_report_renders_code_help_and_label() {
        let mut diags = diagnostics("{transitiv(<1>,<2>)}");
        let report = Report::new(diags.remove(0));
        let output = format!("{report:?}");
        assert!(output.contains("taintlint::syntax::unknown_operation"));
        assert!(output.contains("transitive"));
        assert!(output.contains("test.tsum"));
    }

    #[test]
    fn end_of_input_label_stays_inside_the_text() {
        let diags = diagnostics("{transitive(<0>,<2>), sanitize(<-1>)");
        assert_eq!(diags.len(), 1);
        let (offset, len) = diags[0].label_range();
        let text_len = "{transitive(<0>,<2>), sanitize(<-1>)".len();
        assert!(offset + len <= text_len);
        assert!(len >= 1);
    }

    #[test]
    fn label_range_respects_multibyte_boundaries() {
        let diags = diagnostics("日本");
        for d in &diags {
            let (offset, len) = d.label_range();
            let text = "日本";
            assert!(text.is_char_boundary(offset));
            assert!(text.is_char_boundary(offset + len));
        }
    }
}
