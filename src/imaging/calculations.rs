//! Pure calculation functions for crop geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Rounding is floor-based throughout so identical inputs always produce the
//! identical crop boundaries, independent of the resampling backend.

use crate::types::TargetSize;

/// A crop rectangle in source-pixel coordinates, `[left, right) × [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Whether the box covers the whole `(width, height)` source.
    pub fn is_full(&self, source: (u32, u32)) -> bool {
        self.left == 0 && self.top == 0 && self.right == source.0 && self.bottom == source.1
    }
}

/// Center crop of `source` that matches the aspect ratio of `target`.
///
/// A source relatively wider than the target loses width; anything else,
/// including an exact aspect match, loses height. The kept extent is clamped
/// to `1..=source extent` so extreme sources never yield an empty box.
///
/// # Examples
/// ```
/// # use folio_ingest::imaging::{CropBox, calculate_center_crop};
/// # use folio_ingest::types::TargetSize;
/// let crop = calculate_center_crop((800, 400), TargetSize::new(450, 350));
/// assert_eq!(crop, CropBox { left: 143, top: 0, right: 657, bottom: 400 });
/// ```
pub fn calculate_center_crop(source: (u32, u32), target: TargetSize) -> CropBox {
    let (src_w, src_h) = source;
    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = target.aspect();

    if src_aspect > tgt_aspect {
        // Source is wider: keep full height, trim both sides
        let new_w = ((src_h as f64 * tgt_aspect).floor() as u32).clamp(1, src_w);
        let offset = (src_w - new_w) / 2;
        CropBox {
            left: offset,
            top: 0,
            right: offset + new_w,
            bottom: src_h,
        }
    } else {
        // Source is taller (or equal): keep full width, trim top and bottom
        let new_h = ((src_w as f64 / tgt_aspect).floor() as u32).clamp(1, src_h);
        let offset = (src_h - new_h) / 2;
        CropBox {
            left: 0,
            top: offset,
            right: src_w,
            bottom: offset + new_h,
        }
    }
}
