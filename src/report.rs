//! Report rendering over a diagnostic list.
//!
//! Four read-only views of the same data: a plain-text report, a context
//! report with surrounding lines, an HTML fragment for embedding, and a JSON
//! dump. None of them mutate the diagnostics or the source.
//!
//! Column arithmetic is done in display widths, so the `^~~~` markers line
//! up under wide characters too.

use unicode_width::UnicodeWidthChar;

use crate::diagnostics::Diagnostic;

/// Printed by every renderer when the diagnostic list is empty.
pub const CLEAN_REPORT: &str = "no syntax errors found";

fn width_of(line: &str, from_col: usize, to_col: usize) -> usize {
    line.chars()
        .skip(from_col)
        .take(to_col.saturating_sub(from_col))
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}

fn pad_to(line: &str, col: usize) -> usize {
    width_of(line, 0, col)
}

/// `^~~~` marker for a span confined to one line, at least one caret wide.
fn caret_run(line: &str, start_col: usize, end_col: usize) -> String {
    let run = width_of(line, start_col, end_col).max(1);
    let mut marker = String::with_capacity(run);
    marker.push('^');
    for _ in 1..run {
        marker.push('~');
    }
    marker
}

/// The indicator line under row `row` for a diagnostic spanning
/// `span.start..span.end`, without the gutter prefix.
fn indicator_for_row(d: &Diagnostic, row: usize, line: &str) -> String {
    let start = d.span.start;
    let end = d.span.end;
    let line_cols = line.chars().count();
    if row == start.row && row == end.row {
        format!("{}{}", " ".repeat(pad_to(line, start.col)), caret_run(line, start.col, end.col))
    } else if row == start.row {
        format!("{}{}", " ".repeat(pad_to(line, start.col)), caret_run(line, start.col, line_cols))
    } else if row == end.row {
        "~".repeat(width_of(line, 0, end.col))
    } else {
        "~".repeat(width_of(line, 0, line_cols))
    }
}

/// Plain-text report: one block per diagnostic with its message, 1-based
/// position, offending line, span marker and suggestion.
pub fn render_text(diagnostics: &[Diagnostic], source: &str, source_name: &str) -> String {
    if diagnostics.is_empty() {
        return CLEAN_REPORT.to_string();
    }

    let lines: Vec<&str> = source.split('\n').collect();
    let noun = if diagnostics.len() == 1 { "error" } else { "errors" };
    let mut out = format!("found {} {} in {}:\n\n", diagnostics.len(), noun, source_name);

    for (index, d) in diagnostics.iter().enumerate() {
        let (line_no, column_no) = d.display_position();
        let code_line = lines.get(d.span.start.row).copied().unwrap_or("");
        out.push_str(&format!("error #{}: {}\n", index + 1, d.message));
        out.push_str(&format!("at line {}, column {}\n", line_no, column_no));
        out.push_str(&format!("code: {}\n", code_line));
        // Six spaces mirror the "code: " prefix above.
        out.push_str(&format!(
            "      {}{}\n",
            " ".repeat(pad_to(code_line, d.span.start.col)),
            caret_run(code_line, d.span.start.col, indicator_end_col(d, code_line)),
        ));
        if let Some(suggestion) = &d.suggestion {
            out.push_str(&format!("suggestion: {}\n", suggestion));
        }
        out.push('\n');
    }

    out
}

fn indicator_end_col(d: &Diagnostic, line: &str) -> usize {
    if d.span.end.row == d.span.start.row {
        d.span.end.col
    } else {
        line.chars().count()
    }
}

/// Context report: each diagnostic with one line of context on either side,
/// numbered lines, markers under every spanned row and a dashed separator.
pub fn render_context(diagnostics: &[Diagnostic], source: &str) -> String {
    if diagnostics.is_empty() {
        return CLEAN_REPORT.to_string();
    }

    let lines: Vec<&str> = source.split('\n').collect();
    let mut out = String::new();

    for (index, d) in diagnostics.iter().enumerate() {
        out.push_str(&format!("\nerror #{}: {}\n\n", index + 1, d.message));

        let first = d.span.start.row.saturating_sub(1);
        let last = (d.span.end.row + 1).min(lines.len().saturating_sub(1));
        for row in first..=last {
            let line = lines.get(row).copied().unwrap_or("");
            out.push_str(&format!("{:>4} | {}\n", row + 1, line));
            if row >= d.span.start.row && row <= d.span.end.row {
                // Seven columns of gutter: the line number and " | ".
                out.push_str(&format!("       {}\n", indicator_for_row(d, row, line)));
            }
        }

        if let Some(suggestion) = &d.suggestion {
            out.push_str(&format!("\nsuggestion: {}\n", suggestion));
        }
        out.push_str(&format!("\n{}\n", "-".repeat(50)));
    }

    out
}

/// HTML fragment with the same information as the context report, escaped
/// for embedding. Styling hooks are class names only.
pub fn render_html(diagnostics: &[Diagnostic], source: &str) -> String {
    if diagnostics.is_empty() {
        return format!("<div class=\"no-errors\">{}</div>", CLEAN_REPORT);
    }

    let lines: Vec<&str> = source.split('\n').collect();
    let mut html = String::from("<div class=\"error-visualization\">");

    for (index, d) in diagnostics.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"error\"><h3>error #{}: {}</h3><div class=\"error-context\">",
            index + 1,
            escape_html(&d.message)
        ));

        let first = d.span.start.row.saturating_sub(1);
        let last = (d.span.end.row + 1).min(lines.len().saturating_sub(1));
        for row in first..=last {
            let line = lines.get(row).copied().unwrap_or("");
            let is_error_line = row >= d.span.start.row && row <= d.span.end.row;
            let class = if is_error_line { "code-line error-line" } else { "code-line" };
            html.push_str(&format!(
                "<div class=\"{}\"><span class=\"line-number\">{:>4}</span><span class=\"line-content\">{}</span></div>",
                class,
                row + 1,
                escape_html(line)
            ));
            if is_error_line {
                html.push_str(&format!(
                    "<div class=\"error-indicator\"><span class=\"line-number\">&nbsp;</span><span class=\"indicator\">{}</span></div>",
                    indicator_for_row(d, row, line)
                ));
            }
        }

        if let Some(suggestion) = &d.suggestion {
            html.push_str(&format!(
                "<div class=\"suggestion\">suggestion: {}</div>",
                escape_html(suggestion)
            ));
        }
        html.push_str("</div></div>");
    }

    html.push_str("</div>");
    html
}

/// Pretty-printed JSON array of the diagnostics.
pub fn render_json(diagnostics: &[Diagnostic]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(diagnostics)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
