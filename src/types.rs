//! Shared types passed between the upload boundary, the pipeline, and storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Destination bucket for an upload.
///
/// The lower-case name doubles as the storage subfolder and the URL segment,
/// so it must stay path- and URL-safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Projects,
    Clients,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Projects, Category::Clients];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Projects => "projects",
            Category::Clients => "clients",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "projects" => Ok(Category::Projects),
            "clients" => Ok(Category::Clients),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Exact output footprint in pixels. Both values must be non-zero; the
/// config layer rejects zeros before a `TargetSize` ever reaches the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An uploaded file as received from the request layer.
///
/// The claimed filename is untrusted; it is validated and sanitized before use.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }
}

/// Relative, URL-ready path to a stored image, e.g. `uploads/projects/team.jpg`.
///
/// Stored verbatim in a content row and embedded directly as an image source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredImagePath(String);

impl StoredImagePath {
    pub fn new(public_prefix: &str, category: Category, filename: &str) -> Self {
        Self(format!("{public_prefix}/{category}/{filename}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StoredImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
