//! Filesystem storage implementation for the Quire content pipeline.
//!
//! This crate provides [`FsStorage`], a filesystem-based implementation of the
//! [`Storage`](quire_storage::Storage) trait on top of `std::fs`.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use quire_storage::Storage;
//! use quire_storage_fs::FsStorage;
//!
//! let storage = FsStorage;
//! let text = storage.read(Path::new("content/index.mdx"))?;
//! ```

use std::fs;
use std::path::Path;

use quire_storage::{Entry, EntryKind, Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Stateless: every call goes straight to the filesystem, so a rebuild
/// always observes the current state of the disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStorage;

impl FsStorage {
    /// Create a new filesystem storage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Classify a directory entry without following symlinks.
fn entry_kind(file_type: fs::FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

impl Storage for FsStorage {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        let read_dir = fs::read_dir(dir)
            .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry
                .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;
            // A lossy name would not join back to the real path
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!(
                        path = %dir.join(&raw).display(),
                        "Skipping entry with non-UTF-8 name"
                    );
                    continue;
                }
            };
            // DirEntry::file_type does not traverse symlinks
            let kind = entry.file_type().map_or(EntryKind::Other, entry_kind);
            entries.push(Entry { name, kind });
        }

        Ok(entries)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        let bytes = fs::read(path)
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))?;

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    valid_up_to = e.utf8_error().valid_up_to(),
                    "File is not valid UTF-8, replacing invalid bytes"
                );
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
