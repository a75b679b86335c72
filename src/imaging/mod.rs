//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Crop plan** | floor-based center crop ([`calculate_center_crop`]) |
//! | **Render** | drop alpha + `crop_imm` + Lanczos3 `resize_exact` + encode |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{CropBox, calculate_center_crop};
pub use operations::{RenderConfig, get_dimensions, plan_render, render_upload};
pub use params::{OutputFormat, Quality, RenderParams};
pub use rust_backend::RustBackend;
