//! Ingestion configuration.
//!
//! Handles loading, validating, and merging `ingest.toml`. Stock defaults are
//! serialized to a TOML value and the user file is merged on top of it, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! upload_root = "static/uploads"  # Where category folders live on disk
//! public_prefix = "uploads"       # URL prefix of returned paths
//! max_upload_bytes = 16777216     # Larger uploads are rejected before decoding
//!
//! [categories.projects]
//! width = 450
//! height = 350
//!
//! [categories.clients]
//! width = 450
//! height = 350
//!
//! [output]
//! quality = 90                    # JPEG quality (1-100)
//! naming = "original"             # or "content-hash"
//!
//! [processing]
//! max_processes = 4               # Parallel CLI ingests (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::{Category, TargetSize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Directory holding one subfolder per category.
    pub upload_root: PathBuf,
    /// First segment of every returned path; the static-asset URL of `upload_root`.
    pub public_prefix: String,
    /// Uploads above this size are refused at the boundary.
    pub max_upload_bytes: u64,
    /// Target size per category.
    pub categories: CategoriesConfig,
    /// Encoding and naming of stored files.
    pub output: OutputConfig,
    /// Parallel processing settings (CLI batch ingest).
    pub processing: ProcessingConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            upload_root: PathBuf::from("static/uploads"),
            public_prefix: "uploads".to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
            categories: CategoriesConfig::default(),
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl IngestConfig {
    /// Target size for a category.
    pub fn target_size(&self, category: Category) -> TargetSize {
        match category {
            Category::Projects => self.categories.projects,
            Category::Clients => self.categories.clients,
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let size = self.target_size(category);
            if size.width == 0 || size.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "categories.{category} width and height must be non-zero"
                )));
            }
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation("output.quality must be 1-100".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Validation("max_upload_bytes must be non-zero".into()));
        }
        if !is_url_safe_prefix(&self.public_prefix) {
            return Err(ConfigError::Validation(format!(
                "public_prefix {:?} must be a relative URL path of [A-Za-z0-9_.-] segments",
                self.public_prefix
            )));
        }
        Ok(())
    }
}

fn is_url_safe_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        })
}

/// Per-category target sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoriesConfig {
    pub projects: TargetSize,
    pub clients: TargetSize,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            projects: TargetSize::new(450, 350),
            clients: TargetSize::new(450, 350),
        }
    }
}

/// How stored files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingPolicy {
    /// Sanitized upload name, verbatim. Same name in the same category overwrites.
    #[default]
    Original,
    /// Sanitized name plus a short SHA-256 of the upload bytes.
    ContentHash,
}

/// Output encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG encoding quality (1 = worst, 100 = best). PNG and GIF are lossless.
    pub quality: u32,
    pub naming: NamingPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            naming: NamingPolicy::Original,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel ingests for the CLI.
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
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(IngestConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<IngestConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: IngestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file.
///
/// A missing file yields the stock defaults. A file that exists but does not
/// parse, names unknown keys, or fails validation is an error.
pub fn load_config(path: &Path) -> Result<IngestConfig, ConfigError> {
    let overlay = if path.exists() {
        let content = fs::read_to_string(path)?;
        Some(toml::from_str::<toml::Value>(&content)?)
    } else {
        None
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `ingest.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Ingest Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Directory holding the per-category upload folders.
upload_root = "static/uploads"

# URL prefix of the paths handed back to the content layer.
# "uploads/projects/team.jpg" is served from <static root>/uploads/projects/team.jpg.
public_prefix = "uploads"

# Uploads larger than this many bytes are refused before decoding (16 MiB).
max_upload_bytes = 16777216

# ---------------------------------------------------------------------------
# Target sizes
# ---------------------------------------------------------------------------
# Every stored image is center-cropped to the aspect ratio of its category's
# size, then resized to exactly width x height pixels.
[categories.projects]
width = 450
height = 350

[categories.clients]
width = 450
height = 350

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality (1 = worst, 100 = best).
quality = 90

# "original": store under the sanitized upload name; re-uploading the same
#             name replaces the previous image.
# "content-hash": append a short hash of the upload bytes to the name.
naming = "original"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel ingests for `folio-ingest ingest`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
