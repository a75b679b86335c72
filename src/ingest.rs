//! The ingestion entry point and the upload boundary in front of it.
//!
//! [`Pipeline::ingest`] is the whole core: validate the name, center-crop and
//! resize the bytes to the category's [`TargetSize`](crate::types::TargetSize),
//! store the result, return the public path. It never touches a database;
//! the content layer persists the returned [`StoredImagePath`] verbatim.
//!
//! [`handle_upload`] is what a request handler calls. It applies the checks
//! that belong to the request layer (missing file, empty name, size limit)
//! and folds every outcome into an [`IngestResponse`] with a success flag and
//! a human-readable message. A handler must not insert a content row unless
//! `success` is true.

use crate::config::{IngestConfig, NamingPolicy};
use crate::imaging::{
    BackendError, ImageBackend, OutputFormat, Quality, RenderConfig, RustBackend, render_upload,
};
use crate::naming::{allowed_file, content_hashed_name, storage_name};
use crate::storage::{StorageError, UploadStore};
use crate::types::{Category, StoredImagePath, UploadedImage};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Filename has no extension or one outside the allow-set.
    #[error("invalid upload: {0}")]
    Validation(String),
    /// Bytes are not a decodable image (or could not be re-encoded).
    #[error(transparent)]
    Decode(#[from] BackendError),
    /// Writing the result failed.
    #[error(transparent)]
    Io(#[from] StorageError),
}

/// Synchronous image ingestion for one upload at a time.
///
/// Holds no mutable state, so one `Pipeline` can serve concurrent requests.
pub struct Pipeline<B: ImageBackend = RustBackend> {
    config: IngestConfig,
    store: UploadStore,
    backend: B,
}

impl Pipeline<RustBackend> {
    pub fn new(config: IngestConfig) -> Self {
        Self::with_backend(config, RustBackend::new())
    }
}

impl<B: ImageBackend> Pipeline<B> {
    pub fn with_backend(config: IngestConfig, backend: B) -> Self {
        let store = UploadStore::new(config.upload_root.clone(), config.public_prefix.clone());
        Self {
            config,
            store,
            backend,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn store(&self) -> &UploadStore {
        &self.store
    }

    /// Crop, resize, and store one upload under `category`.
    ///
    /// Writes exactly one file, replacing any same-named file in the category
    /// under the `original` naming policy.
    pub fn ingest(
        &self,
        category: Category,
        upload: &UploadedImage,
    ) -> Result<StoredImagePath, IngestError> {
        if !allowed_file(&upload.filename) {
            return Err(IngestError::Validation(format!(
                "{:?} does not have an allowed image extension",
                upload.filename
            )));
        }
        let name = storage_name(&upload.filename).ok_or_else(|| {
            IngestError::Validation(format!("{:?} has no usable name", upload.filename))
        })?;
        let name = match self.config.output.naming {
            NamingPolicy::Original => name,
            NamingPolicy::ContentHash => content_hashed_name(&name, &upload.data),
        };
        let format = OutputFormat::from_filename(&name)
            .ok_or_else(|| IngestError::Validation(format!("no encoder for {name:?}")))?;

        let target = self.config.target_size(category);
        let encoded = render_upload(
            &self.backend,
            &upload.data,
            &RenderConfig {
                target,
                format,
                quality: Quality::new(self.config.output.quality),
            },
        )?;

        let path = self.store.write(category, &name, &encoded)?;
        tracing::info!(
            %category,
            original = %upload.filename,
            path = %path,
            size = %target,
            "ingested image"
        );
        Ok(path)
    }
}

/// Structured outcome handed back to the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<StoredImagePath>,
}

impl IngestResponse {
    fn stored(path: StoredImagePath) -> Self {
        Self {
            success: true,
            message: "Image uploaded".to_string(),
            path: Some(path),
        }
    }

    fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            path: None,
        }
    }
}

/// Guard an upload the way the request layer does, then run the pipeline.
///
/// `upload` is `None` when the form carried no file field at all.
pub fn handle_upload<B: ImageBackend>(
    pipeline: &Pipeline<B>,
    category: Category,
    upload: Option<&UploadedImage>,
) -> IngestResponse {
    let Some(upload) = upload else {
        tracing::warn!(%category, "upload rejected: no file");
        return IngestResponse::rejected("No image uploaded");
    };
    if upload.filename.is_empty() || !allowed_file(&upload.filename) {
        tracing::warn!(%category, filename = %upload.filename, "upload rejected: invalid file");
        return IngestResponse::rejected("Invalid file");
    }
    let limit = pipeline.config().max_upload_bytes;
    if upload.data.len() as u64 > limit {
        tracing::warn!(
            %category,
            filename = %upload.filename,
            bytes = upload.data.len(),
            limit,
            "upload rejected: too large"
        );
        return IngestResponse::rejected("File too large");
    }

    match pipeline.ingest(category, upload) {
        Ok(path) => IngestResponse::stored(path),
        Err(err) => {
            tracing::warn!(%category, filename = %upload.filename, error = %err, "ingest failed");
            IngestResponse::rejected(match err {
                IngestError::Validation(_) => "Invalid file",
                IngestError::Decode(_) => "Invalid image",
                IngestError::Io(_) => "Failed to store image",
            })
        }
    }
}
