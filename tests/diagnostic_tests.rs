//! Golden master tests for rendered report output.
//!
//! These tests capture the exact formatted output of the report renderers
//! to ensure consistent error presentation across changes.

use taintlint::diagnose;
use taintlint::report::{render_context, render_html, render_json, render_text, CLEAN_REPORT};
use taintlint::syntax::parse;

/// Test helper to capture the plain-text report for a source string.
fn text_report(source: &str, name: &str) -> String {
    render_text(&diagnose(&parse(source), name), source, name)
}

/// Test helper to capture the context report for a source string.
fn context_report(source: &str) -> String {
    render_context(&diagnose(&parse(source), "ctx.tsum"), source)
}

#[test]
fn test_clean_source_reports() {
    let source = "{setSink(<0>), transitive(<1>,<2>)}";
    let diagnostics = diagnose(&parse(source), "clean.tsum");

    assert_eq!(render_text(&diagnostics, source, "clean.tsum"), CLEAN_REPORT);
    assert_eq!(render_context(&diagnostics, source), CLEAN_REPORT);
    assert_eq!(
        render_html(&diagnostics, source),
        "<div class=\"no-errors\">no syntax errors found</div>"
    );
    assert_eq!(render_json(&diagnostics).unwrap(), "[]");
}

#[test]
fn test_unknown_operation_text_report() {
    let output = text_report("{transitiv(<1>,<2>)}", "summary.tsum");

    // Golden master snapshot
    let expected = r#"found 1 error in summary.tsum:

error #1: unknown operation "transitiv"; available operations are: setSink, transitive, sanitize, swapTaint
at line 1, column 2
code: {transitiv(<1>,<2>)}
       ^~~~~~~~~
suggestion: transitive

"#;

    assert_eq!(output, expected);
}

#[test]
fn test_missing_comma_text_report() {
    let output = text_report("{setSink(<0>) transitive(<1>,<2>)}", "summary.tsum");

    // Golden master snapshot; the boundary span is zero-width so the
    // marker is a single caret at the insertion point.
    let expected = r#"found 1 error in summary.tsum:

error #1: missing comma "," between operations
at line 1, column 14
code: {setSink(<0>) transitive(<1>,<2>)}
                   ^
suggestion: add a comma "," between operations

"#;

    assert_eq!(output, expected);
}

#[test]
fn test_missing_closing_brace_text_report() {
    let output = text_report("{setSink(<0>)", "partial.tsum");

    // Golden master snapshot
    let expected = r#"found 1 error in partial.tsum:

error #1: missing closing brace "}" at the end of the summary
at line 1, column 14
code: {setSink(<0>)
                   ^
suggestion: add the missing closing brace "}"

"#;

    assert_eq!(output, expected);
}

#[test]
fn test_multiple_errors_text_report() {
    let output = text_report("{setSink(<12>), transitiv(<1>,<2>)", "multi.tsum");

    // Golden master snapshot
    let expected = r#"found 3 errors in multi.tsum:

error #1: key is too large; keys run from <-1> to <9>
at line 1, column 11
code: {setSink(<12>), transitiv(<1>,<2>)
                ^~
suggestion: key must be an integer between -1 and 9

error #2: unknown operation "transitiv"; available operations are: setSink, transitive, sanitize, swapTaint
at line 1, column 17
code: {setSink(<12>), transitiv(<1>,<2>)
                      ^~~~~~~~~
suggestion: transitive

error #3: missing closing brace "}" at the end of the summary
at line 1, column 35
code: {setSink(<12>), transitiv(<1>,<2>)
                                        ^
suggestion: add the missing closing brace "}"

"#;

    assert_eq!(output, expected);
}

#[test]
fn test_key_range_context_report() {
    let output = context_report("{setSink(<12>),\nsanitize(<0>)}");

    // Golden master snapshot; one context line below, none above.
    let expected = r#"
error #1: key is too large; keys run from <-1> to <9>

   1 | {setSink(<12>),
                 ^~
   2 | sanitize(<0>)}

suggestion: key must be an integer between -1 and 9

--------------------------------------------------
"#;

    assert_eq!(output, expected);
}

#[test]
fn test_middle_line_context_report() {
    let output = context_report("{setSink(<0>),\ntransitiv(<1>,<2>),\nsanitize(<3>)}");

    // Golden master snapshot; context on both sides of the bad line.
    let expected = r#"
error #1: unknown operation "transitiv"; available operations are: setSink, transitive, sanitize, swapTaint

   1 | {setSink(<0>),
   2 | transitiv(<1>,<2>),
       ^~~~~~~~~
   3 | sanitize(<3>)}

suggestion: transitive

--------------------------------------------------
"#;

    assert_eq!(output, expected);
}

#[test]
fn test_misplaced_comma_html_report() {
    let source = "{,}";
    let output = render_html(&diagnose(&parse(source), "frag.tsum"), source);

    // Golden master snapshot
    let expected = r#"<div class="error-visualization"><div class="error"><h3>error #1: misplaced comma &quot;,&quot;</h3><div class="error-context"><div class="code-line error-line"><span class="line-number">   1</span><span class="line-content">{,}</span></div><div class="error-indicator"><span class="line-number">&nbsp;</span><span class="indicator"> ^</span></div><div class="suggestion">suggestion: remove this &quot;,&quot; or put an operation after it</div></div></div></div>"#;

    assert_eq!(output, expected);
}

#[test]
fn test_misplaced_comma_json_report() {
    let source = "{,}";
    let output = render_json(&diagnose(&parse(source), "frag.tsum")).unwrap();

    // Golden master snapshot
    let expected = r#"[
  {
    "kind": "MisplacedComma",
    "span": {
      "start": {
        "byte": 1,
        "row": 0,
        "col": 1
      },
      "end": {
        "byte": 2,
        "row": 0,
        "col": 2
      }
    },
    "snippet": ",",
    "message": "misplaced comma \",\"",
    "suggestion": "remove this \",\" or put an operation after it"
  }
]"#;

    assert_eq!(output, expected);
}
