//! Packaged assets and user-selected local files.

use std::io;
use std::path::{Path, PathBuf};

use super::naming::{generated_file_name, AssetKind, IdGenerator};

// ---------------------------------------------------------------------------
// GeneratedAsset
// ---------------------------------------------------------------------------

/// Named binary file ready for upload.
///
/// Built once per generation or direct upload and never mutated afterwards,
/// so the fields are private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAsset {
    bytes: Vec<u8>,
    mime_type: &'static str,
    file_name: String,
}

impl GeneratedAsset {
    /// Wrap `bytes` under an explicit `file_name` with the kind's MIME type.
    pub fn package(kind: AssetKind, bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: kind.mime_type(),
            file_name: file_name.into(),
        }
    }

    /// Wrap freshly generated `bytes` under a new unique file name.
    pub fn generated(kind: AssetKind, bytes: Vec<u8>, ids: &dyn IdGenerator) -> Self {
        Self::package(kind, bytes, generated_file_name(kind, ids))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// LocalFile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Selection {
    Path(PathBuf),
    InMemory { name: String, bytes: Vec<u8> },
}

/// A file the user picked for direct upload.
///
/// Either a path on disk (read lazily by [`LocalFile::read`]) or content
/// the host UI already holds in memory.
#[derive(Debug, Clone)]
pub struct LocalFile {
    selection: Selection,
}

impl LocalFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            selection: Selection::Path(path.into()),
        }
    }

    pub fn in_memory(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            selection: Selection::InMemory {
                name: name.into(),
                bytes,
            },
        }
    }

    /// Original file name, when one can be determined.
    pub fn name(&self) -> Option<&str> {
        match &self.selection {
            Selection::Path(path) => path.file_name().and_then(|n| n.to_str()),
            Selection::InMemory { name, .. } => Some(name),
        }
    }

    /// Read the full content, returning `(original_name, bytes)`.
    pub async fn read(&self) -> io::Result<(String, Vec<u8>)> {
        match &self.selection {
            Selection::Path(path) => {
                let name = file_name_of(path)?;
                let bytes = tokio::fs::read(path).await?;
                Ok((name, bytes))
            }
            Selection::InMemory { name, bytes } => {
                if name.is_empty() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "selected file has no name",
                    ));
                }
                Ok((name.clone(), bytes.clone()))
            }
        }
    }
}

fn file_name_of(path: &Path) -> io::Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no usable file name in {}", path.display()),
            )
        })
}
