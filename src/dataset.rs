//! Dataset names and raw dataset description files.
//!
//! A slideshow is always graded against one of five fixed datasets. The name
//! on the first line of a submission selects the dataset, and through it the
//! photo catalog the slides are checked against.
//!
//! ## Raw Description Format
//!
//! Each dataset ships as a plain-text description:
//!
//! ```text
//! 4                     # photo count
//! H 3 cat beach sun     # photo 0: style, tag count, tags...
//! V 2 selfie smile      # photo 1
//! V 2 garden selfie     # photo 2
//! H 2 garden cat        # photo 3
//! ```
//!
//! Photos get sequential ids `0..count` in file order. [`parse_description`]
//! turns such a file into a [`PhotoCatalog`]; [`generate_catalogs`] does it
//! for a whole directory and writes the catalog JSON files the grader reads.

use crate::catalog::{CatalogError, Orientation, Photo, PhotoCatalog, PhotoId};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Malformed dataset description at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// The closed set of datasets a submission may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetName {
    Example,
    LovelyLandscapes,
    MemorableMoments,
    PetPictures,
    ShinySelfies,
}

impl DatasetName {
    pub const ALL: [DatasetName; 5] = [
        DatasetName::Example,
        DatasetName::LovelyLandscapes,
        DatasetName::MemorableMoments,
        DatasetName::PetPictures,
        DatasetName::ShinySelfies,
    ];

    /// The literal name as it appears in submissions and catalog filenames.
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetName::Example => "a_example",
            DatasetName::LovelyLandscapes => "b_lovely_landscapes",
            DatasetName::MemorableMoments => "c_memorable_moments",
            DatasetName::PetPictures => "d_pet_pictures",
            DatasetName::ShinySelfies => "e_shiny_selfies",
        }
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the recognized dataset names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDataset(pub String);

impl FromStr for DatasetName {
    type Err = UnknownDataset;

    /// Exact, case-sensitive match against the five literal names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetName::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDataset(s.to_string()))
    }
}

/// Parse a raw dataset description into a photo catalog.
///
/// The declared per-photo tag count must be an integer, but the tags actually
/// present on the line are what the photo gets. Lines beyond the declared
/// photo count are ignored.
pub fn parse_description(content: &str) -> Result<PhotoCatalog, DatasetError> {
    let mut lines = content.lines();

    let count_line = lines.next().unwrap_or("").trim();
    let count: u32 = count_line.parse().map_err(|_| DatasetError::Malformed {
        line: 1,
        reason: format!("expected photo count, found '{count_line}'"),
    })?;

    // The declared count is untrusted; photos are collected as lines are read.
    let mut photos = Vec::new();
    for id in 0..count {
        let line_number = id as usize + 2;
        let line = lines.next().ok_or_else(|| DatasetError::Malformed {
            line: line_number,
            reason: format!("declared {count} photos but file ends early"),
        })?;
        let mut tokens = line.split_whitespace();

        let orientation = match tokens.next() {
            Some("H") => Orientation::Horizontal,
            Some("V") => Orientation::Vertical,
            other => {
                return Err(DatasetError::Malformed {
                    line: line_number,
                    reason: format!("expected style H or V, found '{}'", other.unwrap_or("")),
                });
            }
        };

        let tag_count = tokens.next().unwrap_or("");
        if tag_count.parse::<usize>().is_err() {
            return Err(DatasetError::Malformed {
                line: line_number,
                reason: format!("expected tag count, found '{tag_count}'"),
            });
        }

        let photo = Photo {
            orientation,
            tags: tokens.map(str::to_string).collect(),
        };
        photos.push((PhotoId(id), photo));
    }

    Ok(photos.into_iter().collect())
}

/// Read and parse a raw dataset description file.
pub fn load_description(path: &Path) -> Result<PhotoCatalog, DatasetError> {
    let content = fs::read_to_string(path)?;
    parse_description(&content)
}

/// Convert every raw description in `datasets_dir` into `<stem>.json` inside
/// `catalog_dir`.
///
/// Returns the written catalog paths in filename order. Subdirectories are
/// not descended into.
pub fn generate_catalogs(
    datasets_dir: &Path,
    catalog_dir: &Path,
) -> Result<Vec<PathBuf>, DatasetError> {
    fs::create_dir_all(catalog_dir)?;

    let mut written = Vec::new();
    for entry in walkdir::WalkDir::new(datasets_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(stem) = entry.path().file_stem() else {
            continue;
        };

        let catalog = load_description(entry.path())?;
        let out = catalog_dir.join(format!("{}.json", stem.to_string_lossy()));
        catalog.save(&out)?;
        tracing::debug!(
            source = %entry.path().display(),
            output = %out.display(),
            photos = catalog.len(),
            "Wrote photo catalog"
        );
        written.push(out);
    }
    Ok(written)
}
