//! Packager — wraps raw bytes into named, typed files ready for upload.
//!
//! * [`AssetKind`] fixes the MIME type and file-name shape per asset type.
//! * [`IdGenerator`] / [`UuidGenerator`] supply the unique id embedded in
//!   generated names (`podcast-<id>.mp3`, `thumbnail-<id>.png`).
//! * [`GeneratedAsset`] is the immutable packaged file.
//! * [`LocalFile`] is a user-selected file for the direct-upload path.

pub mod file;
pub mod naming;

pub use file::{GeneratedAsset, LocalFile};
pub use naming::{generated_file_name, AssetKind, IdGenerator, UuidGenerator};

#[cfg(test)]
pub use naming::SequenceIds;
