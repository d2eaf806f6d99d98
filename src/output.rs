//! CLI output formatting for grading results.
//!
//! # Output Format
//!
//! ## Batch
//!
//! ```text
//! Evaluating file: a_example.txt
//!     Dataset: a_example (3 slides)
//! Score: 2
//! Evaluating file: b_reused_photo.txt
//!     Line 6 is invalid, picture 0 is used at least twice in the slideshow.
//! Score: 0
//!
//! Cumulated score over all the result files is: 2 (2 files, 1 rejected)
//! ```
//!
//! ## Catalog
//!
//! ```text
//! Catalogs
//!     datasets_map/a_example.json
//! Generated 1 catalog
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::{BatchReport, FileScore};
use crate::evaluate::{EvalError, Evaluation};
use std::path::PathBuf;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Detail line for a grading outcome: dataset summary or the rejection reason.
fn outcome_detail(outcome: &Result<Evaluation, EvalError>) -> String {
    match outcome {
        Ok(eval) => format!(
            "{}Dataset: {} ({})",
            indent(1),
            eval.dataset,
            plural(eval.slides, "slide")
        ),
        Err(e) => format!("{}{}", indent(1), e),
    }
}

// ============================================================================
// Evaluate
// ============================================================================

pub fn format_file_score(file: &FileScore) -> Vec<String> {
    vec![
        format!("Evaluating file: {}", file.name()),
        outcome_detail(&file.outcome),
        format!("Score: {}", file.score()),
    ]
}

pub fn print_file_score(file: &FileScore) {
    for line in format_file_score(file) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch
// ============================================================================

pub fn format_batch_report(report: &BatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report.files.iter().flat_map(format_file_score).collect();
    lines.push(String::new());
    lines.push(format!(
        "Cumulated score over all the result files is: {} ({}, {} rejected)",
        report.total,
        plural(report.files.len(), "file"),
        report.rejected()
    ));
    lines
}

pub fn print_batch_report(report: &BatchReport) {
    for line in format_batch_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

pub fn format_catalog_output(written: &[PathBuf]) -> Vec<String> {
    let mut lines = vec!["Catalogs".to_string()];
    for path in written {
        lines.push(format!("{}{}", indent(1), path.display()));
    }
    lines.push(format!("Generated {}", plural(written.len(), "catalog")));
    lines
}

pub fn print_catalog_output(written: &[PathBuf]) {
    for line in format_catalog_output(written) {
        println!("{}", line);
    }
}
