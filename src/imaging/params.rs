//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides the crop and the output) and the [`backend`](super::backend)
//! (which does the actual pixel work). Keeping them separate lets tests swap
//! in a recording backend without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`OutputFormat`]: Encoder chosen from the stored filename's extension.
//! - [`RenderParams`]: everything needed to render one upload: crop box, exact output size, format, quality.

use super::calculations::CropBox;
use crate::naming::extension_of;
use crate::types::TargetSize;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Encoded format of a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    /// Pick the encoder from a filename's last extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        match extension_of(filename)?.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

/// Parameters for a crop-then-resize render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    /// Region of the decoded source to keep.
    pub crop: CropBox,
    /// Exact output dimensions.
    pub target: TargetSize,
    pub format: OutputFormat,
    pub quality: Quality,
}
