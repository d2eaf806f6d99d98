//! # slide-grade
//!
//! A grader for photo slideshow submissions. A submission names a dataset,
//! declares a slide count, and lists one slide per line; each slide holds one
//! horizontal photo or up to two vertical ones. The grader checks every slide
//! against the dataset's photo catalog and sums how interesting each
//! transition between neighbouring slides is.
//!
//! # Pipeline
//!
//! ```text
//! datasets/*.txt   →  catalog   →  datasets_map/*.json   (once per dataset)
//! outputs/*        →  evaluate  →  score per file, cumulated total
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dataset`] | The five dataset names; raw description parsing and catalog generation |
//! | [`catalog`] | Photo catalog: id → orientation and tags, JSON load/save |
//! | [`slide`] | Per-slide legality checks and slide tag sets |
//! | [`score`] | Transition score between two tag sets |
//! | [`evaluate`] | Grades one submission end to end |
//! | [`batch`] | Grades every submission in a directory, in parallel |
//! | [`config`] | `grader.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Grading Rules
//!
//! Grading is all or nothing. The first illegal slide, in file order, is
//! reported with its line number and the whole file scores 0. The rules for a
//! slide are checked in a fixed order (see [`slide`]), so the same submission
//! always reports the same error.
//!
//! The interest of a transition from tags `A` to tags `B` is
//! `min(|A ∩ B|, |A − B|, |B − A|)`. A legal submission scores the sum over
//! all neighbouring pairs.
//!
//! # Design Decisions
//!
//! ## Canonical Photo Ids
//!
//! Catalog keys are decimal strings. A slide token only names a photo when it
//! is written the same way, so `01` is an unknown photo rather than photo 1.
//!
//! ## Commit Policy
//!
//! Photos are recorded as used either one at a time as they pass their checks
//! or only once the whole slide is legal ([`slide::CommitPolicy`]). Scores do
//! not depend on the choice.
//!
//! ## Independent Files
//!
//! Every submission gets its own catalog load, used-photo set and running
//! total. That makes batch grading safe to run in parallel, and the batch
//! total is a plain sum over files.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod evaluate;
pub mod output;
pub mod score;
pub mod slide;

#[cfg(test)]
pub(crate) mod test_helpers;
