//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify (read dimensions) and render (decode, drop alpha, crop,
//! resize, encode).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Backends work on in-memory bytes; writing the result is the job of
//! [`UploadStore`](crate::storage::UploadStore).

use super::params::RenderParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can serve concurrent uploads.
pub trait ImageBackend: Sync {
    /// Get image dimensions from the encoded bytes.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode `data`, apply `params`, and return the encoded output.
    fn render(&self, data: &[u8], params: &RenderParams) -> Result<Vec<u8>, BackendError>;
}
