//! Grader configuration.
//!
//! Handles loading and validating `grader.toml`. Stock defaults are
//! serialized to a TOML table and the user file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! catalog_dir = "datasets_map"    # Photo catalog JSON files, one per dataset
//! results_dir = "outputs"         # Submissions graded by `batch`
//! datasets_dir = "datasets"       # Raw dataset descriptions read by `catalog`
//! commit_policy = "incremental"   # or "staged"
//!
//! [processing]
//! max_processes = 4               # Max parallel graders (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::slide::CommitPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config filename, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "grader.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Grader configuration loaded from `grader.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraderConfig {
    /// Directory holding `<dataset>.json` photo catalogs.
    pub catalog_dir: String,
    /// Directory of submissions graded by the batch command.
    pub results_dir: String,
    /// Directory of raw dataset descriptions used to build catalogs.
    pub datasets_dir: String,
    /// When a slide's photos are recorded as used.
    pub commit_policy: CommitPolicy,
    /// Parallel grading settings.
    pub processing: ProcessingConfig,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            catalog_dir: "datasets_map".to_string(),
            results_dir: "outputs".to_string(),
            datasets_dir: "datasets".to_string(),
            commit_policy: CommitPolicy::Incremental,
            processing: ProcessingConfig::default(),
        }
    }
}

impl GraderConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("catalog_dir", &self.catalog_dir),
            ("results_dir", &self.results_dir),
            ("datasets_dir", &self.datasets_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel grading settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of files graded at once.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GraderConfig::default()).expect("default config must serialize")
}

/// Lay a user `grader.toml` table over the stock defaults.
///
/// Nested tables such as `[processing]` merge key by key, so setting one key
/// keeps its siblings; scalars from `overlay` win outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge user TOML text over the stock defaults, then deserialize and validate.
pub fn parse_config(content: &str) -> Result<GraderConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value(), overlay);
    let config: GraderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// A missing file yields the stock defaults; an unreadable or invalid one is
/// an error.
pub fn load_config(path: &Path) -> Result<GraderConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(GraderConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `grader.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# slide-grade configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory holding one photo catalog per dataset, named <dataset>.json.
catalog_dir = "datasets_map"

# Directory of submissions graded by `slide-grade batch`.
results_dir = "outputs"

# Directory of raw dataset descriptions read by `slide-grade catalog`.
datasets_dir = "datasets"

# When the photos of a slide are recorded as used:
#   "incremental" - each photo as soon as it passes its own checks
#   "staged"      - all photos at once, only if the whole slide is legal
# Scores are identical under both.
commit_policy = "incremental"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of submission files graded in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
