//! Non-recursive directory scanning.

use std::path::{Path, PathBuf};

use quire_storage::{EntryKind, Storage, StorageErrorKind};

use crate::route::is_content_file;

/// Content files and subdirectories directly inside one directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Content files, as full paths.
    pub files: Vec<PathBuf>,
    /// Subdirectory names.
    pub directories: Vec<String>,
}

impl DirectoryListing {
    /// Check if the listing has neither files nor subdirectories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

/// List content files and subdirectories of `dir`.
///
/// Entries keep the storage enumeration order. Hidden entries (names
/// starting with `.`) and non-content files are skipped. A directory that
/// is missing or cannot be listed yields an empty listing.
pub fn scan_directory(storage: &dyn Storage, dir: &Path) -> DirectoryListing {
    let entries = match storage.list(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == StorageErrorKind::NotFound => {
            tracing::debug!(path = %dir.display(), "Content directory does not exist");
            return DirectoryListing::default();
        }
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "Failed to list content directory");
            return DirectoryListing::default();
        }
    };

    let mut listing = DirectoryListing::default();
    for entry in entries {
        if entry.name.starts_with('.') {
            continue;
        }
        match entry.kind {
            EntryKind::File if is_content_file(&entry.name) => {
                listing.files.push(dir.join(&entry.name));
            }
            EntryKind::Directory => listing.directories.push(entry.name),
            _ => {}
        }
    }
    listing
}
