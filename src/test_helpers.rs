//! Shared test utilities: synthetic images and isolated configs.
//!
//! Images are generated in memory so tests never depend on fixture files.

use crate::config::IngestConfig;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Opaque RGB gradient; every pixel differs so crops are observable.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// RGBA image whose left half is fully transparent.
pub fn transparent_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([(x % 256) as u8, (y % 256) as u8, 200, alpha])
    }))
}

/// Encode an image as PNG bytes.
pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Stock config with the upload root moved under `root`.
pub fn test_config(root: &Path) -> IngestConfig {
    IngestConfig {
        upload_root: root.join("static/uploads"),
        ..IngestConfig::default()
    }
}
