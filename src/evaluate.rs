//! Grading of a single slideshow submission.
//!
//! A submission is read top to bottom in four phases:
//!
//! ```text
//! ReadHeader  → line 1 names one of the five datasets
//! LoadCatalog → the dataset's photo catalog is fetched from a CatalogSource
//! ReadCount   → line 2 is the number of slides n
//! Slides      → lines 3..n+2, one slide each, validated and scored in order
//! ```
//!
//! Any failure ends grading of the file with an [`EvalError`]; there is no
//! partial credit for the slides before it. On success the [`Evaluation`]
//! holds the sum of transition scores over every adjacent pair of slides.
//!
//! Lines are trimmed before use. A file shorter than its declared slide count
//! reads as empty lines, so the first missing slide reports an empty slide.
//! Lines after the last declared slide are ignored.

use crate::catalog::{CatalogError, CatalogSource, PhotoCatalog};
use crate::dataset::DatasetName;
use crate::score::transition_score;
use crate::slide::{CommitPolicy, SlideError, TagSet, UsedPhotos, slide_tags, validate_slide};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Line number of the first slide; lines 1 and 2 are the header.
const FIRST_SLIDE_LINE: usize = 3;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Invalid dataset name in the first line: '{0}'")]
    InvalidDatasetName(String),
    #[error("Incorrect value in the second line, an integer is expected (found '{0}')")]
    InvalidCountFormat(String),
    #[error(transparent)]
    Slide(#[from] SlideError),
    #[error("Cannot load catalog for {dataset}: {source}")]
    Catalog {
        dataset: DatasetName,
        #[source]
        source: CatalogError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EvalError {
    /// Submission line the error refers to, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            EvalError::InvalidDatasetName(_) => Some(1),
            EvalError::InvalidCountFormat(_) => Some(2),
            EvalError::Slide(e) => Some(e.line()),
            EvalError::Catalog { .. } | EvalError::Io(_) => None,
        }
    }
}

/// Result of grading a legal slideshow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub dataset: DatasetName,
    pub slides: usize,
    pub score: u64,
}

/// Score a grading outcome: the total for a legal slideshow, 0 otherwise.
pub fn final_score(outcome: &Result<Evaluation, EvalError>) -> u64 {
    outcome.as_ref().map_or(0, |e| e.score)
}

/// Grade a submission read from `reader`.
pub fn evaluate<R, S>(
    mut reader: R,
    catalogs: &S,
    policy: CommitPolicy,
) -> Result<Evaluation, EvalError>
where
    R: BufRead,
    S: CatalogSource + ?Sized,
{
    let dataset = read_header(&mut reader)?;
    let catalog = catalogs
        .load(dataset)
        .map_err(|source| EvalError::Catalog { dataset, source })?;
    let declared = read_count(&mut reader)?;
    let score = score_slides(&mut reader, &catalog, declared, policy)?;

    Ok(Evaluation {
        dataset,
        slides: declared,
        score,
    })
}

/// Grade the submission stored at `path`.
pub fn evaluate_file<S>(
    path: &Path,
    catalogs: &S,
    policy: CommitPolicy,
) -> Result<Evaluation, EvalError>
where
    S: CatalogSource + ?Sized,
{
    tracing::debug!(path = %path.display(), ?policy, "Evaluating submission");
    let file = File::open(path)?;
    let outcome = evaluate(BufReader::new(file), catalogs, policy);
    if let Err(e) = &outcome {
        tracing::info!(path = %path.display(), line = ?e.line(), error = %e, "Submission rejected");
    }
    outcome
}

/// Read one line, trimmed. End of input reads as an empty line.
fn next_line<R: BufRead>(reader: &mut R) -> Result<String, EvalError> {
    let mut buf = String::new();
    reader.read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<DatasetName, EvalError> {
    let line = next_line(reader)?;
    line.parse().map_err(|_| EvalError::InvalidDatasetName(line))
}

fn read_count<R: BufRead>(reader: &mut R) -> Result<usize, EvalError> {
    let line = next_line(reader)?;
    line.parse().map_err(|_| EvalError::InvalidCountFormat(line))
}

fn score_slides<R: BufRead>(
    reader: &mut R,
    catalog: &PhotoCatalog,
    declared: usize,
    policy: CommitPolicy,
) -> Result<u64, EvalError> {
    let mut used = UsedPhotos::new();
    let mut previous: Option<TagSet<'_>> = None;
    let mut total = 0u64;

    for index in 0..declared {
        let line_number = index + FIRST_SLIDE_LINE;
        let line = next_line(reader)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let slide = validate_slide(&tokens, line_number, catalog, &mut used, policy)?;
        let tags = slide_tags(&slide);
        if let Some(prev) = &previous {
            let transition = transition_score(prev, &tags);
            tracing::trace!(line = line_number, transition, "Scored transition");
            total += transition;
        }
        previous = Some(tags);
    }

    Ok(total)
}
