//! `StorageClient` trait, storage handles and error types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::GeneratedAsset;

/// Errors raised by the managed-storage backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("storage request timed out")]
    Timeout,

    /// The backend answered with a non-success status code.
    #[error("storage backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("failed to parse storage response: {0}")]
    Parse(String),

    /// A backend function ran and reported an error.
    #[error("storage function failed: {message}")]
    Function { message: String },

    /// The storage id does not map to a retrievable file.
    #[error("no URL available for storage id '{0}'")]
    UrlNotFound(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StorageError::Timeout
        } else {
            StorageError::Request(e.to_string())
        }
    }
}

/// Opaque handle assigned by the backend once an upload completes.
///
/// Serializes as the bare id string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageReference {
    pub storage_id: String,
}

impl StorageReference {
    pub fn new(storage_id: impl Into<String>) -> Self {
        Self {
            storage_id: storage_id.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.storage_id
    }
}

impl std::fmt::Display for StorageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.storage_id)
    }
}

/// One-shot write destination for a single new file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDestination {
    pub url: String,
}

/// Async trait over the upload-target / upload / resolve sequence.
///
/// Implementors must be `Send + Sync` so one client can serve both
/// pipelines behind an `Arc<dyn StorageClient>`.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Obtain a write destination for a new file.
    async fn request_upload_target(&self) -> Result<UploadDestination, StorageError>;

    /// Upload `asset` to `destination`, returning the assigned reference.
    async fn upload_file(
        &self,
        destination: &UploadDestination,
        asset: &GeneratedAsset,
    ) -> Result<StorageReference, StorageError>;

    /// Turn `reference` into a fetchable URL.
    async fn resolve_url(&self, reference: &StorageReference) -> Result<String, StorageError>;
}

// ---------------------------------------------------------------------------
// MockStorageClient  (test-only)
// ---------------------------------------------------------------------------

/// Step at which [`MockStorageClient`] injects its failure.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageStep {
    Target,
    Upload,
    Resolve,
}

/// What the mock saw arrive at the upload step.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub len: usize,
}

/// In-memory storage backend. Hands out `storage-<n>` ids that resolve to
/// `https://files.test/storage-<n>`, optionally failing at one step.
#[cfg(test)]
pub struct MockStorageClient {
    failure: Option<(StorageStep, StorageError)>,
    uploads: std::sync::Mutex<Vec<UploadedFile>>,
    resolved: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockStorageClient {
    pub fn ok() -> Self {
        Self {
            failure: None,
            uploads: std::sync::Mutex::new(Vec::new()),
            resolved: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(step: StorageStep, error: StorageError) -> Self {
        Self {
            failure: Some((step, error)),
            ..Self::ok()
        }
    }

    pub fn uploads(&self) -> Vec<UploadedFile> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }

    fn check(&self, step: StorageStep) -> Result<(), StorageError> {
        match &self.failure {
            Some((at, error)) if *at == step => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl StorageClient for MockStorageClient {
    async fn request_upload_target(&self) -> Result<UploadDestination, StorageError> {
        self.check(StorageStep::Target)?;
        Ok(UploadDestination {
            url: "https://files.test/upload".into(),
        })
    }

    async fn upload_file(
        &self,
        _destination: &UploadDestination,
        asset: &GeneratedAsset,
    ) -> Result<StorageReference, StorageError> {
        self.check(StorageStep::Upload)?;
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(UploadedFile {
            file_name: asset.file_name().to_string(),
            mime_type: asset.mime_type(),
            len: asset.len(),
        });
        Ok(StorageReference::new(format!("storage-{}", uploads.len())))
    }

    async fn resolve_url(&self, reference: &StorageReference) -> Result<String, StorageError> {
        self.check(StorageStep::Resolve)?;
        self.resolved
            .lock()
            .unwrap()
            .push(reference.storage_id.clone());
        Ok(format!("https://files.test/{}", reference.storage_id))
    }
}
