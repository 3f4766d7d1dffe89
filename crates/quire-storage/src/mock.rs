//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// In-memory node: a file with content or an explicit directory.
#[derive(Debug, Clone)]
enum Node {
    File(String),
    Directory,
}

/// Mock storage for testing.
///
/// Stores files and directories in memory. Listing preserves insertion
/// order, which stands in for filesystem enumeration order. Directories are
/// implied by the files below them; use [`MockStorage::with_dir`] for empty
/// ones.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use quire_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("/content/docs/intro.mdx", "---\ntitle: Intro\n---\n")
///     .with_dir("/content/empty");
///
/// let entries = storage.list(Path::new("/content")).unwrap();
/// assert_eq!(entries.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    nodes: RwLock<Vec<(PathBuf, Node)>>,
    unreadable: RwLock<HashSet<PathBuf>>,
    unlistable: RwLock<HashSet<PathBuf>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.set_file(path, content);
        self
    }

    /// Add an explicit (possibly empty) directory.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut nodes = self.nodes.write().unwrap();
        if !nodes.iter().any(|(p, _)| *p == path) {
            nodes.push((path, Node::Directory));
        }
        drop(nodes);
        self
    }

    /// Mark a file as unreadable: it is still listed, but `read` fails with
    /// [`StorageErrorKind::PermissionDenied`].
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_unreadable(self, path: impl Into<PathBuf>) -> Self {
        self.set_unreadable(path, true);
        self
    }

    /// Mark a directory as unlistable: `list` fails with
    /// [`StorageErrorKind::PermissionDenied`].
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_unlistable(self, path: impl Into<PathBuf>) -> Self {
        self.unlistable.write().unwrap().insert(path.into());
        self
    }

    /// Create or replace a file.
    ///
    /// Replacing keeps the file's original listing position.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        let mut nodes = self.nodes.write().unwrap();
        if let Some((_, node)) = nodes.iter_mut().find(|(p, _)| *p == path) {
            *node = Node::File(content);
        } else {
            nodes.push((path, Node::File(content)));
        }
    }

    /// Remove a file or directory together with everything below it.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove(&self, path: &Path) {
        self.nodes
            .write()
            .unwrap()
            .retain(|(p, _)| !p.starts_with(path));
    }

    /// Toggle the unreadable flag of a file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_unreadable(&self, path: impl Into<PathBuf>, unreadable: bool) {
        let path = path.into();
        let mut set = self.unreadable.write().unwrap();
        if unreadable {
            set.insert(path);
        } else {
            set.remove(&path);
        }
    }

    fn is_known_dir(nodes: &[(PathBuf, Node)], dir: &Path) -> bool {
        nodes.iter().any(|(p, node)| match node {
            Node::Directory => p.starts_with(dir),
            Node::File(_) => p.starts_with(dir) && p != dir,
        })
    }
}

impl Storage for MockStorage {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        if self.unlistable.read().unwrap().contains(dir) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(dir)
                .with_backend(BACKEND));
        }

        let nodes = self.nodes.read().unwrap();
        if !Self::is_known_dir(&nodes, dir) {
            return Err(StorageError::not_found(dir).with_backend(BACKEND));
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (path, node) in nodes.iter() {
            let Ok(rest) = path.strip_prefix(dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            if !seen.insert(name.clone()) {
                continue;
            }
            let is_leaf = components.next().is_none();
            let kind = match node {
                Node::File(_) if is_leaf => EntryKind::File,
                _ => EntryKind::Directory,
            };
            entries.push(Entry { name, kind });
        }

        Ok(entries)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        if self.unreadable.read().unwrap().contains(path) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }

        self.nodes
            .read()
            .unwrap()
            .iter()
            .find_map(|(p, node)| match node {
                Node::File(content) if p == path => Some(content.clone()),
                _ => None,
            })
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &Path) -> bool {
        let nodes = self.nodes.read().unwrap();
        nodes.iter().any(|(p, _)| p == path) || Self::is_known_dir(&nodes, path)
    }
}
