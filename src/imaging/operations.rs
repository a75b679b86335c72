//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_center_crop;
use super::params::{OutputFormat, Quality, RenderParams};
use crate::types::TargetSize;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, data: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.identify(data)?;
    Ok((dims.width, dims.height))
}

/// What a single upload should be turned into.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub target: TargetSize,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Plan a render without executing it.
pub fn plan_render(source: (u32, u32), config: &RenderConfig) -> RenderParams {
    RenderParams {
        crop: calculate_center_crop(source, config.target),
        target: config.target,
        format: config.format,
        quality: config.quality,
    }
}

/// Center-crop and resize an encoded upload to the configured target.
///
/// Reads the dimensions first, plans the crop, then hands the pixel work to
/// the backend. Returns the encoded output bytes.
pub fn render_upload(
    backend: &impl ImageBackend,
    data: &[u8],
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    let source = get_dimensions(backend, data)?;
    let params = plan_render(source, config);
    tracing::debug!(
        source = ?source,
        crop = ?params.crop,
        target = %config.target,
        "planned center crop"
    );
    backend.render(data, &params)
}
