//! Slide legality checks and slide tag sets.
//!
//! A slide is one line of a submission: one or two photo ids. The checks run
//! in a fixed order and the first violated rule is the one reported:
//!
//! 1. the slide has at least one photo
//! 2. the slide has at most two photos
//! 3. for each photo, in line order:
//!    - the id exists in the catalog
//!    - a horizontal photo is alone on its slide
//!    - the photo was not already used by this or an earlier slide
//!
//! ## Commit Policy
//!
//! Photos that pass their checks are recorded in the [`UsedPhotos`] set
//! shared across the whole slideshow. With [`CommitPolicy::Incremental`]
//! each photo is recorded as soon as it passes, so a legal first photo stays
//! reserved even if the second one fails. [`CommitPolicy::Staged`] checks
//! the whole slide first and records nothing unless every photo passes.
//! Because any failure aborts grading, both policies yield the same scores
//! and the same first error; only the used set left behind differs.

use crate::catalog::{Orientation, Photo, PhotoCatalog, PhotoId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Most photos a single slide may hold.
pub const MAX_SLIDE_PHOTOS: usize = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlideError {
    #[error("Line {line} is invalid, there is no picture on the slide.")]
    EmptySlide { line: usize },
    #[error("Line {line} is invalid, there is more than 2 pictures on the slide ({count} given).")]
    OversizedSlide { line: usize, count: usize },
    #[error("Line {line} is invalid, picture {photo} doesn't exist in the original dataset.")]
    UnknownPhoto { line: usize, photo: String },
    #[error(
        "Line {line} is invalid, there is more than 1 horizontal picture on the slide (picture {photo} is horizontal)."
    )]
    MultiHorizontalSlide { line: usize, photo: PhotoId },
    #[error("Line {line} is invalid, picture {photo} is used at least twice in the slideshow.")]
    DuplicatePhotoUsage { line: usize, photo: PhotoId },
}

impl SlideError {
    /// 1-based line of the submission the error was found on.
    pub fn line(&self) -> usize {
        match self {
            SlideError::EmptySlide { line }
            | SlideError::OversizedSlide { line, .. }
            | SlideError::UnknownPhoto { line, .. }
            | SlideError::MultiHorizontalSlide { line, .. }
            | SlideError::DuplicatePhotoUsage { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitPolicy {
    /// Record each photo as soon as it passes its own checks.
    #[default]
    Incremental,
    /// Record the slide's photos only once the whole slide is legal.
    Staged,
}

/// Photo ids already placed on a slide in the current slideshow.
#[derive(Debug, Clone, Default)]
pub struct UsedPhotos {
    ids: HashSet<PhotoId>,
}

impl UsedPhotos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: PhotoId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn insert(&mut self, id: PhotoId) {
        self.ids.insert(id);
    }
}

/// A legal slide with its photos resolved against the catalog.
#[derive(Debug, Clone)]
pub struct Slide<'c> {
    members: Vec<(PhotoId, &'c Photo)>,
}

impl<'c> Slide<'c> {
    pub fn ids(&self) -> impl Iterator<Item = PhotoId> + '_ {
        self.members.iter().map(|(id, _)| *id)
    }

    pub fn photos(&self) -> impl Iterator<Item = &'c Photo> + '_ {
        self.members.iter().map(|(_, photo)| *photo)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Tags describing a slide, borrowed from the catalog.
pub type TagSet<'c> = BTreeSet<&'c str>;

/// Check one slide and record its photos in `used`.
///
/// `tokens` are the whitespace-separated ids from the slide's line, `line`
/// its 1-based position in the submission (for diagnostics).
pub fn validate_slide<'c>(
    tokens: &[&str],
    line: usize,
    catalog: &'c PhotoCatalog,
    used: &mut UsedPhotos,
    policy: CommitPolicy,
) -> Result<Slide<'c>, SlideError> {
    if tokens.is_empty() {
        return Err(SlideError::EmptySlide { line });
    }
    if tokens.len() > MAX_SLIDE_PHOTOS {
        return Err(SlideError::OversizedSlide {
            line,
            count: tokens.len(),
        });
    }

    let mut members: Vec<(PhotoId, &'c Photo)> = Vec::with_capacity(tokens.len());
    for &token in tokens {
        let (id, photo) = catalog
            .resolve(token)
            .ok_or_else(|| SlideError::UnknownPhoto {
                line,
                photo: token.to_string(),
            })?;

        if photo.orientation == Orientation::Horizontal && tokens.len() > 1 {
            return Err(SlideError::MultiHorizontalSlide { line, photo: id });
        }

        // Staged slides have not touched `used` yet, so same-slide repeats
        // are checked against the pending members.
        if used.contains(id) || members.iter().any(|(m, _)| *m == id) {
            return Err(SlideError::DuplicatePhotoUsage { line, photo: id });
        }

        if policy == CommitPolicy::Incremental {
            used.insert(id);
        }
        members.push((id, photo));
    }

    if policy == CommitPolicy::Staged {
        for (id, _) in &members {
            used.insert(*id);
        }
    }

    Ok(Slide { members })
}

/// Union of the tags of every photo on the slide.
pub fn slide_tags<'c>(slide: &Slide<'c>) -> TagSet<'c> {
    slide
        .photos()
        .flat_map(|photo| photo.tags.iter().map(String::as_str))
        .collect()
}
