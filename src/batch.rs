//! Grading every submission in a results directory.
//!
//! Each regular file directly inside the directory is graded on its own:
//! its own used-photo set, its own running total, its own catalog load. A
//! rejected file scores 0 and grading moves on to the next one.
//!
//! ## Parallel Grading
//!
//! Files are independent, so they are graded in parallel using
//! [rayon](https://docs.rs/rayon). Results come back in filename order no
//! matter which worker finished first.

use crate::catalog::CatalogSource;
use crate::evaluate::{EvalError, Evaluation, evaluate_file, final_score};
use crate::slide::CommitPolicy;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Cannot read results directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Outcome of grading one submission file.
#[derive(Debug)]
pub struct FileScore {
    pub path: PathBuf,
    pub outcome: Result<Evaluation, EvalError>,
}

impl FileScore {
    pub fn score(&self) -> u64 {
        final_score(&self.outcome)
    }

    /// Filename relative to the results directory, for display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub files: Vec<FileScore>,
    /// Sum of every file's score.
    pub total: u64,
}

impl BatchReport {
    pub fn rejected(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_err()).count()
    }
}

/// List submission files directly inside `dir`, sorted by filename.
pub fn submission_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Grade every submission in `dir`.
pub fn grade_directory<S>(
    dir: &Path,
    catalogs: &S,
    policy: CommitPolicy,
) -> Result<BatchReport, BatchError>
where
    S: CatalogSource + Sync + ?Sized,
{
    let files = submission_files(dir)?;
    tracing::debug!(dir = %dir.display(), count = files.len(), "Grading results directory");

    let files: Vec<FileScore> = files
        .into_par_iter()
        .map(|path| {
            let outcome = evaluate_file(&path, catalogs, policy);
            FileScore { path, outcome }
        })
        .collect();

    let total = files.iter().map(FileScore::score).sum();
    Ok(BatchReport { files, total })
}
