//! Publisher — upload a packaged asset and resolve its URL.

use std::sync::Arc;

use super::error::PipelineError;
use crate::asset::GeneratedAsset;
use crate::storage::{StorageClient, StorageError, StorageReference};

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedAsset {
    pub reference: StorageReference,
    pub url: String,
}

/// Runs upload target → upload → resolve, strictly in sequence.
#[derive(Clone)]
pub struct Publisher {
    storage: Arc<dyn StorageClient>,
}

impl Publisher {
    pub fn new(storage: Arc<dyn StorageClient>) -> Self {
        Self { storage }
    }

    /// Upload `asset` and resolve the URL it can be fetched from.
    ///
    /// A failure at either of the first two steps is an
    /// [`PipelineError::Upload`]; at the last one a
    /// [`PipelineError::Resolution`]. An empty URL counts as unresolved.
    pub async fn publish(&self, asset: &GeneratedAsset) -> Result<PublishedAsset, PipelineError> {
        let destination = self
            .storage
            .request_upload_target()
            .await
            .map_err(PipelineError::Upload)?;

        let reference = self
            .storage
            .upload_file(&destination, asset)
            .await
            .map_err(PipelineError::Upload)?;

        log::debug!(
            "publisher: {} stored as {}",
            asset.file_name(),
            reference.storage_id
        );

        let url = self
            .storage
            .resolve_url(&reference)
            .await
            .map_err(PipelineError::Resolution)?;

        if url.is_empty() {
            return Err(PipelineError::Resolution(StorageError::UrlNotFound(
                reference.storage_id,
            )));
        }

        Ok(PublishedAsset { reference, url })
    }
}
