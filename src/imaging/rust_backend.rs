//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format | `image::ImageReader::with_guessed_format` (magic bytes, never the filename) |
//! | Decode (JPEG, PNG, GIF) | `image` crate decoders |
//! | Drop alpha | `DynamicImage::to_rgb8` |
//! | Crop | `DynamicImage::crop_imm` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode | `JpegEncoder` (quality), `PngEncoder`, `GifEncoder` (RGB frame) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{OutputFormat, RenderParams};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Decode an image from memory, sniffing the format from its bytes.
fn load_image(data: &[u8]) -> Result<DynamicImage, BackendError> {
    reader(data)?
        .decode()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Normalize to an 8-bit mode without alpha.
///
/// Alpha is discarded, not blended: the color channels are kept as-is, which
/// is the same as compositing over an implicit black background for fully
/// transparent pixels. 8-bit grayscale and RGB pass through untouched.
fn drop_alpha(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Encode to the requested format.
fn encode(img: &DynamicImage, format: OutputFormat, quality: u32) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality as u8))
        }
        OutputFormat::Png => img.write_with_encoder(PngEncoder::new(&mut buf)),
        OutputFormat::Gif => {
            // The GIF encoder quantizes RGB frames; feed it 3 channels so no
            // transparent palette entry is ever emitted.
            let rgb = img.to_rgb8();
            let mut encoder = GifEncoder::new(&mut buf);
            encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        }
    };
    result.map_err(|e| BackendError::Encode(format!("{format:?}: {e}")))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = reader(data)?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, data: &[u8], params: &RenderParams) -> Result<Vec<u8>, BackendError> {
        let img = drop_alpha(load_image(data)?);

        let crop = params.crop;
        let cropped = if crop.is_full((img.width(), img.height())) {
            img
        } else {
            img.crop_imm(crop.left, crop.top, crop.width(), crop.height())
        };

        let resized = cropped.resize_exact(
            params.target.width,
            params.target.height,
            FilterType::Lanczos3,
        );

        encode(&resized, params.format, params.quality.value())
    }
}
