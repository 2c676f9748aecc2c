//! Managed storage — upload targets, uploads and URL resolution.
//!
//! * [`StorageClient`] — async trait the [`Publisher`](crate::pipeline::Publisher) drives.
//! * [`HttpStorageClient`] — implementation over the backend's HTTP function API.
//! * [`StorageReference`] / [`UploadDestination`] — handles passed between steps.

pub mod client;
pub mod http;

pub use client::{StorageClient, StorageError, StorageReference, UploadDestination};
pub use http::HttpStorageClient;

#[cfg(test)]
pub use client::{MockStorageClient, StorageStep, UploadedFile};
