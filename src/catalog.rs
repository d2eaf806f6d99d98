//! Per-dataset photo catalogs.
//!
//! A catalog maps every photo id of a dataset to its orientation and tags.
//! It is produced once from the raw dataset description (see
//! [`crate::dataset`]) and stored as JSON next to the grader:
//!
//! ```json
//! {
//!   "0": { "style": "H", "tags": ["cat", "beach", "sun"] },
//!   "1": { "style": "V", "tags": ["selfie", "smile"] }
//! }
//! ```
//!
//! The evaluator only ever reads catalogs. Lookups return `Option` so an
//! unknown id is an ordinary result, not an error path.

use crate::dataset::DatasetName;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid photo id in catalog: '{0}'")]
    InvalidPhotoId(String),
}

/// Index of a photo within its dataset, assigned in description file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(pub u32);

impl PhotoId {
    /// Parse an id token in canonical decimal form.
    ///
    /// Catalog keys are written as plain decimal numbers, so `"01"`, `"+1"`
    /// or `" 1"` do not name photo 1.
    pub fn from_token(token: &str) -> Option<PhotoId> {
        let canonical = !token.is_empty()
            && token.bytes().all(|b| b.is_ascii_digit())
            && (token == "0" || !token.starts_with('0'));
        if !canonical {
            return None;
        }
        token.parse().ok().map(PhotoId)
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "H")]
    Horizontal,
    #[serde(rename = "V")]
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(rename = "style")]
    pub orientation: Orientation,
    pub tags: BTreeSet<String>,
}

/// Immutable lookup from photo id to photo attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoCatalog {
    photos: BTreeMap<PhotoId, Photo>,
}

impl PhotoCatalog {
    pub fn get(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.get(&id)
    }

    /// Resolve a raw slide token. Non-canonical tokens never resolve.
    pub fn resolve(&self, token: &str) -> Option<(PhotoId, &Photo)> {
        let id = PhotoId::from_token(token)?;
        self.get(id).map(|photo| (id, photo))
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, Photo> = serde_json::from_str(json)?;
        raw.into_iter()
            .map(|(key, photo)| match PhotoId::from_token(&key) {
                Some(id) => Ok((id, photo)),
                None => Err(CatalogError::InvalidPhotoId(key)),
            })
            .collect()
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl FromIterator<(PhotoId, Photo)> for PhotoCatalog {
    fn from_iter<I: IntoIterator<Item = (PhotoId, Photo)>>(iter: I) -> Self {
        Self {
            photos: iter.into_iter().collect(),
        }
    }
}

impl Serialize for PhotoCatalog {
    /// Keys are written as decimal strings in ascending id order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.photos.len()))?;
        for (id, photo) in &self.photos {
            map.serialize_entry(&id.to_string(), photo)?;
        }
        map.end()
    }
}

/// Where the evaluator gets the catalog for a validated dataset name.
pub trait CatalogSource {
    fn load(&self, dataset: DatasetName) -> Result<PhotoCatalog, CatalogError>;
}

/// Catalogs stored as `<dir>/<dataset>.json`.
#[derive(Debug, Clone)]
pub struct CatalogDir {
    dir: PathBuf,
}

impl CatalogDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, dataset: DatasetName) -> PathBuf {
        self.dir.join(format!("{dataset}.json"))
    }
}

impl CatalogSource for CatalogDir {
    fn load(&self, dataset: DatasetName) -> Result<PhotoCatalog, CatalogError> {
        let path = self.path_for(dataset);
        let catalog = PhotoCatalog::load(&path)?;
        tracing::debug!(
            dataset = %dataset,
            path = %path.display(),
            photos = catalog.len(),
            "Loaded photo catalog"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn canonical_tokens_parse() {
        assert_eq!(PhotoId::from_token("0"), Some(PhotoId(0)));
        assert_eq!(PhotoId::from_token("42"), Some(PhotoId(42)));
    }

    #[test]
    fn non_canonical_tokens_rejected() {
        for token in ["", "01", "+1", "-1", "1.0", " 1", "x", "99999999999"] {
            assert_eq!(PhotoId::from_token(token), None, "token {token:?}");
        }
    }

    #[test]
    fn parses_catalog_json() {
        let catalog = PhotoCatalog::from_json(
            r#"{"0": {"style": "H", "tags": ["a", "b"]}, "1": {"style": "V", "tags": []}}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(PhotoId(0)).unwrap().orientation,
            Orientation::Horizontal
        );
        assert!(catalog.get(PhotoId(1)).unwrap().tags.is_empty());
        assert!(catalog.get(PhotoId(2)).is_none());
    }

    #[test]
    fn duplicate_tags_collapse_into_set() {
        let catalog =
            PhotoCatalog::from_json(r#"{"0": {"style": "V", "tags": ["a", "a", "b"]}}"#).unwrap();
        assert_eq!(catalog.get(PhotoId(0)).unwrap().tags.len(), 2);
    }

    #[test]
    fn rejects_non_numeric_keys() {
        let result = PhotoCatalog::from_json(r#"{"zero": {"style": "H", "tags": []}}"#);
        assert!(matches!(result, Err(CatalogError::InvalidPhotoId(k)) if k == "zero"));
    }

    #[test]
    fn rejects_unknown_style() {
        let result = PhotoCatalog::from_json(r#"{"0": {"style": "X", "tags": []}}"#);
        assert!(matches!(result, Err(CatalogError::Json(_))));
    }

    #[test]
    fn resolve_requires_canonical_token() {
        let catalog = three_photo_catalog();
        assert!(catalog.resolve("1").is_some());
        assert!(catalog.resolve("01").is_none());
        assert!(catalog.resolve("7").is_none());
    }

    #[test]
    fn serializes_keys_in_numeric_order() {
        let catalog: PhotoCatalog = (0..11)
            .map(|i| (PhotoId(i), photo(Orientation::Vertical, &[])))
            .collect();
        let json = serde_json::to_string(&catalog).unwrap();
        let nine = json.find("\"9\"").unwrap();
        let ten = json.find("\"10\"").unwrap();
        assert!(nine < ten);
    }

    #[test]
    fn save_then_load_preserves_catalog() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("c.json");
        let catalog = three_photo_catalog();
        catalog.save(&path).unwrap();
        assert_eq!(PhotoCatalog::load(&path).unwrap(), catalog);
    }

    #[test]
    fn catalog_dir_loads_by_dataset_name() {
        let tmp = setup_fixtures();
        let source = CatalogDir::new(tmp.path().join("datasets_map"));
        let catalog = source.load(DatasetName::Example).unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn catalog_dir_missing_file_is_io_error() {
        let tmp = setup_fixtures();
        let source = CatalogDir::new(tmp.path().join("datasets_map"));
        let result = source.load(DatasetName::ShinySelfies);
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
