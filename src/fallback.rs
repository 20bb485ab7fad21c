//! Line-oriented fallback checks, for when the grammar-based parser cannot
//! be used.
//!
//! Approximate on purpose: single-line pattern heuristics can both miss real
//! defects and report spurious ones, and they are not required to agree with
//! the parser on the same input. Absence of findings here is not proof of
//! well-formedness.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::{to_error_source, Diagnostic};
use crate::summary::Operation;
use crate::syntax::{classify_key, ErrorKind, Pos, Span};

static KEY_REGION: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([^>]+)>").expect("valid regex"));
/// Looser than the parser's key rule: any single optional-sign digit
/// passes, so e.g. `<-5>` slips through unreported.
static LOOSE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]$").expect("valid regex"));
static WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("valid regex"));

/// Distinctive pieces of the canonical names. A word containing one of
/// these without being canonical reads as a misspelled operation.
const NAME_FRAGMENTS: [&str; 4] = ["Sink", "transitive", "sanitize", "swap"];

struct Line<'a> {
    text: &'a str,
    start: usize,
    row: usize,
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (row, text) in source.split('\n').enumerate() {
        lines.push(Line { text, start, row });
        start += text.len() + 1;
    }
    lines
}

fn pos_at(line: &Line<'_>, byte_off: usize) -> Pos {
    Pos {
        byte: line.start + byte_off,
        row: line.row,
        col: line.text[..byte_off].chars().count(),
    }
}

/// Scans `source` line by line and reports what the patterns can see.
/// Yields the same diagnostic shape as the parser path, ordered by span
/// start.
pub fn check(source: &str, source_name: &str) -> Vec<Diagnostic> {
    let lines = split_lines(source);
    let mut found: Vec<(ErrorKind, Span, String)> = Vec::new();
    let mut close_brace_found = false;

    for line in &lines {
        let text = line.text;
        if text.contains('}') {
            close_brace_found = true;
        }

        // A line that applies an operation, has no separator and is
        // followed by another operation is missing its comma.
        if text.contains(')') && !text.contains(',') && !text.contains('}') {
            if let Some(next) = lines.get(line.row + 1) {
                let next = next.text.trim_start();
                if Operation::ALL.iter().any(|op| next.starts_with(op.name())) {
                    let end = pos_at(line, text.trim_end().len());
                    found.push((ErrorKind::MissingComma, Span::point(end), String::new()));
                }
            }
        }

        // Per-line paren counting, not matching.
        let opens = text.matches('(').count();
        let closes = text.matches(')').count();
        if opens > closes {
            let end = pos_at(line, text.trim_end().len());
            found.push((ErrorKind::MissingCloseParen, Span::point(end), String::new()));
        } else if closes > opens {
            if let Some(off) = text.find(')') {
                let span = Span::new(pos_at(line, off), pos_at(line, off + 1));
                found.push((ErrorKind::MissingOpenParen, span, ")".to_string()));
            }
        }

        // Angle-bracketed regions that cannot be valid keys.
        for caps in KEY_REGION.captures_iter(text) {
            if let Some(inner) = caps.get(1) {
                let content = inner.as_str();
                if LOOSE_KEY.is_match(content) {
                    continue;
                }
                if let Some(kind) = classify_key(content) {
                    let span = Span::new(pos_at(line, inner.start()), pos_at(line, inner.end()));
                    found.push((kind, span, content.to_string()));
                }
            }
        }

        // Words that look like a canonical name but are not one.
        for m in WORDS.find_iter(text) {
            let word = m.as_str();
            if Operation::from_name(word).is_some() {
                continue;
            }
            if NAME_FRAGMENTS.iter().any(|fragment| word.contains(fragment)) {
                let span = Span::new(pos_at(line, m.start()), pos_at(line, m.end()));
                found.push((ErrorKind::UnknownOperation, span, word.to_string()));
            }
        }
    }

    if !close_brace_found {
        if let Some(last) = lines.last() {
            let end = pos_at(last, last.text.len());
            found.push((ErrorKind::MissingClosingBrace, Span::point(end), String::new()));
        }
    }

    found.sort_by_key(|(_, span, _)| span.start.byte);

    let handle = to_error_source(source_name, source);
    found
        .into_iter()
        .map(|(kind, span, snippet)| {
            Diagnostic::from_scan(kind, span, snippet, Arc::clone(&handle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::diagnose;
    use crate::syntax::parse;

    fn kinds(src: &str) -> Vec<ErrorKind> {
        check(src, "scan.tsum").iter().map(|d| d.kind).collect()
    }

    #[test]
    fn clean_summary_scans_clean() {
        assert!(kinds("{setSink(<0>), transitive(<1>,<2>)}").is_empty());
    }

    #[test]
    fn whole_text_without_closing_brace_is_reported_once() {
        let diags = check("{transitive(<0>,<2>), sanitize(<-1>)", "scan.tsum");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::MissingClosingBrace);
        assert_eq!(diags[0].span.start.byte, "{transitive(<0>,<2>), sanitize(<-1>)".len());
    }

    #[test]
    fn missing_comma_between_lines_is_caught() {
        let src = "{setSink(<0>)\ntransitive(<1>,<2>)}";
        let diags = check(src, "scan.tsum");
        assert_eq!(diags[0].kind, ErrorKind::MissingComma);
        assert_eq!(diags[0].span.start.row, 0);
        assert_eq!(diags[0].span.start.byte, "{setSink(<0>)".len());
    }

    #[test]
    fn paren_imbalance_is_counted_per_line() {
        assert_eq!(kinds("{setSink(<0>}"), vec![ErrorKind::MissingCloseParen]);
        let diags = check("{setSink<0>)}", "scan.tsum");
        assert_eq!(diags[0].kind, ErrorKind::MissingOpenParen);
        assert_eq!(diags[0].snippet, ")");
    }

    #[test]
    fn bad_keys_get_their_specific_kinds() {
        assert_eq!(kinds("{setSink(<12>)}"), vec![ErrorKind::NumberTooLarge]);
        assert_eq!(kinds("{setSink(<-12>)}"), vec![ErrorKind::NumberTooSmall]);
        assert_eq!(kinds("{setSink(<2.5>)}"), vec![ErrorKind::NonIntegerNumber]);
        assert_eq!(kinds("{setSink(<x>)}"), vec![ErrorKind::InvalidNumberChar]);
    }

    #[test]
    fn misspelled_names_with_known_fragments_are_flagged() {
        let diags = check("{sanitizer(<0>)}", "scan.tsum");
        assert_eq!(diags[0].kind, ErrorKind::UnknownOperation);
        assert_eq!(diags[0].snippet, "sanitizer");
        assert_eq!(diags[0].suggestion.as_deref(), Some("sanitize"));
    }

    #[test]
    fn scan_is_approximate_where_the_parser_is_exact() {
        // The single-sign-digit test lets <-5> through.
        assert!(kinds("{setSink(<-5>)}").is_empty());
        assert!(parse("{setSink(<-5>)}").has_errors());

        // "transitiv" contains none of the name fragments.
        assert!(kinds("{transitiv(<1>,<2>)}").is_empty());
        assert_eq!(diagnose(&parse("{transitiv(<1>,<2>)}"), "s").len(), 1);
    }

    #[test]
    fn findings_are_ordered_by_span_start() {
        let src = "{transitive(<12>\nsanitizer(<0>)}";
        let diags = check(src, "scan.tsum");
        assert!(diags.len() >= 2);
        for pair in diags.windows(2) {
            assert!(pair[0].span.start.byte <= pair[1].span.start.byte);
        }
    }

    #[test]
    fn scanning_empty_input_still_reports_the_brace() {
        assert_eq!(kinds(""), vec![ErrorKind::MissingClosingBrace]);
    }
}
