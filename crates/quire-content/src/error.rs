//! Content pipeline error type.

use std::path::PathBuf;

use quire_storage::StorageError;

/// Error returned when building a content tree fails.
///
/// Only conditions that make a complete tree impossible are errors. Missing
/// directories, malformed front-matter and empty content sets degrade to a
/// valid result instead.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// A content file that was listed could not be read.
    #[error("Failed to read content file {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
}

impl ContentError {
    /// Path of the file that caused the error.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}

/// Error returned when writing a manifest fails.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Manifest could not be serialized.
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Manifest file or its directory could not be written.
    #[error("Failed to write manifest {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
