//! Shared test utilities for the slide-grade test suite.
//!
//! Provides small in-memory catalogs, a counting [`CatalogSource`], and a
//! fixture copier for tests that need real files on disk.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let source = StaticCatalogs::single(DatasetName::Example, three_photo_catalog());
//! let result = evaluate("a_example\n1\n0\n".as_bytes(), &source, CommitPolicy::Staged);
//! assert_eq!(source.loads(), 1);
//! ```

use std::cell::Cell;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use tempfile::TempDir;

use crate::catalog::{CatalogError, CatalogSource, Orientation, Photo, PhotoCatalog, PhotoId};
use crate::dataset::DatasetName;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` to a temp directory and return it.
///
/// Layout: `datasets/` (raw descriptions), `datasets_map/` (catalog JSON),
/// `outputs/` (submissions).
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Catalog builders
// =========================================================================

/// Raw description of the `a_example` dataset.
pub const EXAMPLE_DESCRIPTION: &str = "4\nH 3 cat beach sun\nV 2 selfie smile\nV 2 garden selfie\nH 2 garden cat\n";

pub fn photo(orientation: Orientation, tags: &[&str]) -> Photo {
    Photo {
        orientation,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Sorted tags of a photo, for readable assertions.
pub fn tags_of(photo: &Photo) -> Vec<&str> {
    photo.tags.iter().map(String::as_str).collect()
}

/// `{0: H [a, b], 1: V [a, c], 2: V [b, c]}`
pub fn three_photo_catalog() -> PhotoCatalog {
    [
        (PhotoId(0), photo(Orientation::Horizontal, &["a", "b"])),
        (PhotoId(1), photo(Orientation::Vertical, &["a", "c"])),
        (PhotoId(2), photo(Orientation::Vertical, &["b", "c"])),
    ]
    .into_iter()
    .collect()
}

/// Three photos where each neighbour pair shares one tag and keeps two of
/// its own, so `0`, `1`, `2` as single slides scores 1 per transition.
pub fn chain_catalog() -> PhotoCatalog {
    [
        (PhotoId(0), photo(Orientation::Horizontal, &["a", "b", "c"])),
        (PhotoId(1), photo(Orientation::Vertical, &["c", "d", "e"])),
        (PhotoId(2), photo(Orientation::Vertical, &["e", "f", "g"])),
    ]
    .into_iter()
    .collect()
}

/// Catalog of the `a_example` dataset.
pub fn example_catalog() -> PhotoCatalog {
    crate::dataset::parse_description(EXAMPLE_DESCRIPTION).unwrap()
}

// =========================================================================
// In-memory catalog source
// =========================================================================

/// Catalogs held in memory, counting how often one was requested.
#[derive(Default)]
pub struct StaticCatalogs {
    catalogs: HashMap<DatasetName, PhotoCatalog>,
    loads: Cell<usize>,
}

impl StaticCatalogs {
    pub fn single(dataset: DatasetName, catalog: PhotoCatalog) -> Self {
        let mut source = Self::default();
        source.catalogs.insert(dataset, catalog);
        source
    }

    pub fn loads(&self) -> usize {
        self.loads.get()
    }
}

impl CatalogSource for StaticCatalogs {
    fn load(&self, dataset: DatasetName) -> Result<PhotoCatalog, CatalogError> {
        self.loads.set(self.loads.get() + 1);
        self.catalogs.get(&dataset).cloned().ok_or_else(|| {
            CatalogError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no catalog for {dataset}"),
            ))
        })
    }
}
