// Corpus-driven checks over the sample summaries in tests/cases/.
//
// File naming is the contract: `ok_*.tsum` must analyze clean and
// `bad_*.tsum` must produce at least one diagnostic. Every file, either
// way, must survive every renderer.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use taintlint::report::{render_context, render_html, render_json};
use taintlint::{analyze, Analyzer, Backend};

/// Discovers all .tsum files recursively under the given root directory.
fn discover_cases<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "tsum")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

fn file_stem(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

#[test]
fn corpus_is_present() {
    let cases = discover_cases("tests/cases");
    assert!(
        cases.len() >= 8,
        "expected the sample corpus under tests/cases, found {} files",
        cases.len()
    );
}

#[test]
fn ok_cases_analyze_clean() {
    for path in discover_cases("tests/cases") {
        let name = file_stem(&path);
        if !name.starts_with("ok_") {
            continue;
        }
        let source = fs::read_to_string(&path).unwrap();
        let analysis = analyze(&source);
        assert!(
            analysis.is_clean(),
            "{} should be clean, got: {}",
            name,
            analysis.report
        );
        assert!(analysis.tree.is_some());
    }
}

#[test]
fn bad_cases_report_ordered_diagnostics() {
    for path in discover_cases("tests/cases") {
        let name = file_stem(&path);
        if !name.starts_with("bad_") {
            continue;
        }
        let source = fs::read_to_string(&path).unwrap();
        let analysis = analyze(&source);
        assert!(!analysis.is_clean(), "{} should report errors", name);
        for pair in analysis.errors.windows(2) {
            assert!(
                pair[0].span.start.byte <= pair[1].span.start.byte,
                "diagnostics out of order in {}",
                name
            );
        }
    }
}

#[test]
fn every_case_survives_every_renderer() {
    for path in discover_cases("tests/cases") {
        let name = file_stem(&path);
        let source = fs::read_to_string(&path).unwrap();

        let analysis = analyze(&source);
        let _ = render_context(&analysis.errors, &source);
        let _ = render_html(&analysis.errors, &source);
        let json = render_json(&analysis.errors).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_array(), "json report for {} is not an array", name);
        if let Some(tree) = &analysis.tree {
            assert!(!tree.to_sexp().is_empty());
        }

        // The pattern backend must at least get through the same input.
        let _ = Analyzer::new()
            .with_backend(Backend::Patterns)
            .with_source_name(name)
            .analyze(&source);
    }
}
