//! # Folio Ingest
//!
//! The image ingestion pipeline behind a portfolio site's admin panel. An
//! uploaded image goes in; a fixed-size, center-cropped copy comes out on
//! disk, together with the relative path the content layer stores in its
//! `projects.image` / `clients.image` column.
//!
//! # Pipeline
//!
//! ```text
//! filename ─ allowed_file ─┐
//! bytes ──── identify ─────┼─ center crop ─ Lanczos3 resize ─ encode ─ atomic write
//!                          │
//!                TargetSize (per category)
//!                                        → "uploads/<category>/<sanitized-name>"
//! ```
//!
//! 1. **Validate**: only `png`, `jpg`, `jpeg`, `gif` extensions are eligible.
//!    The declared content-type is ignored; the decoder sniffs the bytes.
//! 2. **Crop**: the longer axis (relative to the target aspect ratio) is
//!    trimmed symmetrically, with floor rounding.
//! 3. **Resize**: exactly to the category's width × height. Alpha is dropped.
//! 4. **Store**: under the sanitized original name, replacing any previous
//!    file of that name in the category.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ingest`] | [`Pipeline`](ingest::Pipeline) entry point and the upload boundary ([`handle_upload`](ingest::handle_upload)) |
//! | [`imaging`] | Crop math, backend trait, `image`-crate backend |
//! | [`naming`] | Extension validation and filename sanitization |
//! | [`storage`] | Category folders and atomic writes |
//! | [`config`] | `ingest.toml` loading, merging over stock defaults, validation |
//! | [`types`] | `Category`, `TargetSize`, `UploadedImage`, `StoredImagePath` |
//! | [`output`] | CLI output formatting |
//!
//! # What it does not do
//!
//! No database access, no HTML, no HTTP. The pipeline is synchronous and
//! stateless; callers wanting a timeout impose it around the call.

pub mod config;
pub mod imaging;
pub mod ingest;
pub mod naming;
pub mod output;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
