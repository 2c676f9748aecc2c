//! Failure taxonomy shared by both pipelines.

use thiserror::Error;

use crate::generation::GenerationError;
use crate::storage::StorageError;

/// Errors that can end a pipeline cycle.
///
/// Every variant is caught at the pipeline boundary: logged, reported to the
/// notifier and stored in [`AssetState::error`](super::AssetState::error).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The prompt was empty; no remote call was made.
    #[error("a prompt is required")]
    EmptyPrompt,

    /// The remote generation call failed.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Obtaining an upload target or uploading the file failed.
    #[error("upload failed: {0}")]
    Upload(StorageError),

    /// The storage reference could not be turned into a URL.
    #[error("URL resolution failed: {0}")]
    Resolution(StorageError),

    /// The file selected for direct upload could not be read.
    #[error("could not read the selected file: {0}")]
    FileRead(String),
}

/// Coarse category of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Generation,
    Upload,
    Resolution,
    FileRead,
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::EmptyPrompt => FailureKind::Validation,
            PipelineError::Generation(_) => FailureKind::Generation,
            PipelineError::Upload(_) => FailureKind::Upload,
            PipelineError::Resolution(_) => FailureKind::Resolution,
            PipelineError::FileRead(_) => FailureKind::FileRead,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::FileRead(e.to_string())
    }
}
