//! Content tree construction.
//!
//! The tree mirrors the directory layout under the content root. Each node
//! owns the records of the content files directly inside it and its child
//! directories keyed by name.

use std::collections::BTreeMap;
use std::path::Path;

use quire_storage::Storage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::record::{ContentRecord, parse_content};
use crate::scanner::scan_directory;

/// Name of the root node.
pub const ROOT_NAME: &str = "root";

/// One directory of the content tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentTreeNode {
    /// Directory basename, or [`ROOT_NAME`] for the root.
    pub name: String,
    /// Directory path relative to the content root, `/`-separated, without a
    /// leading slash. Empty for the root.
    pub path: String,
    /// Records of content files directly in this directory, in enumeration
    /// order.
    pub contents: Vec<ContentRecord>,
    /// Child directories keyed by name.
    pub subdirectories: BTreeMap<String, ContentTreeNode>,
}

impl ContentTreeNode {
    /// Create an empty node.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            contents: Vec::new(),
            subdirectories: BTreeMap::new(),
        }
    }

    /// Create an empty root node.
    #[must_use]
    pub fn root() -> Self {
        Self::new(ROOT_NAME, "")
    }

    /// Iterate over every record in the subtree, depth-first.
    ///
    /// A node's own contents come before the records of its subdirectories,
    /// which are visited in name order.
    #[must_use]
    pub fn records(&self) -> Records<'_> {
        Records {
            current: std::slice::Iter::default(),
            pending: vec![self],
        }
    }

    /// Number of records in the subtree.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records().count()
    }

    /// Check if the subtree has no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().next().is_none()
    }

    /// Find the node for a `/`-separated directory path relative to this node.
    ///
    /// An empty path (or `/`) returns this node.
    #[must_use]
    pub fn find(&self, dir: &str) -> Option<&Self> {
        dir.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.subdirectories.get(segment))
    }

    /// Flattened records of every top-level directory.
    ///
    /// Directories without content are left out, as are records directly in
    /// this node.
    #[must_use]
    pub fn collections(&self) -> BTreeMap<String, Vec<ContentRecord>> {
        self.subdirectories
            .iter()
            .filter(|(_, node)| !node.is_empty())
            .map(|(name, node)| (name.clone(), node.records().cloned().collect()))
            .collect()
    }

    /// Record count of every top-level directory with content.
    #[must_use]
    pub fn directory_summary(&self) -> BTreeMap<String, usize> {
        self.subdirectories
            .iter()
            .map(|(name, node)| (name.clone(), node.record_count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Depth-first iterator over the records of a subtree.
///
/// Created by [`ContentTreeNode::records`].
#[derive(Debug)]
pub struct Records<'a> {
    current: std::slice::Iter<'a, ContentRecord>,
    pending: Vec<&'a ContentTreeNode>,
}

impl<'a> Iterator for Records<'a> {
    type Item = &'a ContentRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.current.next() {
                return Some(record);
            }
            let node = self.pending.pop()?;
            self.current = node.contents.iter();
            // Reversed so the first subdirectory is popped first
            self.pending.extend(node.subdirectories.values().rev());
        }
    }
}

/// Build the content tree for a content root.
///
/// A missing root produces an empty tree.
///
/// # Errors
///
/// Returns [`ContentError`] if any listed content file cannot be read. No
/// partial tree is returned in that case.
pub fn build_tree(storage: &dyn Storage, root: &Path) -> Result<ContentTreeNode, ContentError> {
    let tree = build_node(storage, root, root, "")?;

    let records = tree.record_count();
    if records == 0 {
        tracing::warn!(path = %root.display(), "No content files found");
    } else {
        tracing::debug!(path = %root.display(), records, "Built content tree");
    }

    Ok(tree)
}

/// Build the subtree for one directory.
///
/// # Arguments
///
/// * `storage` - Storage backend
/// * `dir` - Directory to build
/// * `root` - Content root (routes are relative to it)
/// * `relative` - `dir` relative to `root`, `/`-separated, empty for the root
///
/// # Errors
///
/// Returns [`ContentError`] if any content file in the subtree cannot be
/// read.
pub fn build_node(
    storage: &dyn Storage,
    dir: &Path,
    root: &Path,
    relative: &str,
) -> Result<ContentTreeNode, ContentError> {
    let listing = scan_directory(storage, dir);

    let contents = listing
        .files
        .par_iter()
        .map(|file| parse_content(storage, file, dir, root))
        .collect::<Result<Vec<_>, _>>()?;

    let subdirectories = listing
        .directories
        .par_iter()
        .map(|name| {
            let child_relative = if relative.is_empty() {
                name.clone()
            } else {
                format!("{relative}/{name}")
            };
            let node = build_node(storage, &dir.join(name), root, &child_relative)?;
            Ok::<_, ContentError>((name.clone(), node))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let name = if relative.is_empty() {
        ROOT_NAME
    } else {
        relative.rsplit('/').next().unwrap_or(relative)
    };

    Ok(ContentTreeNode {
        name: name.to_owned(),
        path: relative.to_owned(),
        contents,
        subdirectories,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use quire_storage::MockStorage;
    use quire_storage_fs::FsStorage;

    use super::*;

    static_assertions::assert_impl_all!(ContentTreeNode: Send, Sync, Clone);
    static_assertions::assert_impl_all!(ContentRecord: Send, Sync, Clone);

    fn sample_storage() -> MockStorage {
        MockStorage::new()
            .with_file("/c/index.mdx", "---\ntitle: Home\n---\n")
            .with_file("/c/docs/intro.mdx", "---\ntitle: Intro\n---\n")
            .with_file("/c/docs/guides/setup.mdx", "# Setup")
            .with_file("/c/docs/guides/index.tsx", "")
            .with_file("/c/components/button.tsx", "---\ncategory: inputs\n---\n")
            .with_dir("/c/empty")
    }

    fn routes(tree: &ContentTreeNode) -> Vec<&str> {
        tree.records().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn test_build_tree_structure() {
        let tree = build_tree(&sample_storage(), Path::new("/c")).unwrap();

        assert_eq!(tree.name, "root");
        assert_eq!(tree.path, "");
        assert_eq!(tree.contents.len(), 1);
        assert_eq!(tree.contents[0].path, "/");
        assert_eq!(
            tree.subdirectories.keys().collect::<Vec<_>>(),
            vec!["components", "docs", "empty"]
        );

        let guides = &tree.subdirectories["docs"].subdirectories["guides"];
        assert_eq!(guides.name, "guides");
        assert_eq!(guides.path, "docs/guides");
        assert_eq!(
            guides.contents.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["setup", "index"]
        );
        assert_eq!(guides.contents[1].path, "/docs/guides");

        let empty = &tree.subdirectories["empty"];
        assert!(empty.contents.is_empty());
        assert!(empty.subdirectories.is_empty());
    }

    #[test]
    fn test_every_content_file_appears_once() {
        let tree = build_tree(&sample_storage(), Path::new("/c")).unwrap();

        let mut sources: Vec<PathBuf> = tree.records().map(|r| r.source.clone()).collect();
        sources.sort();

        assert_eq!(
            sources,
            vec![
                PathBuf::from("/c/components/button.tsx"),
                PathBuf::from("/c/docs/guides/index.tsx"),
                PathBuf::from("/c/docs/guides/setup.mdx"),
                PathBuf::from("/c/docs/intro.mdx"),
                PathBuf::from("/c/index.mdx"),
            ]
        );
    }

    #[test]
    fn test_records_depth_first_order() {
        let tree = build_tree(&sample_storage(), Path::new("/c")).unwrap();

        assert_eq!(
            routes(&tree),
            vec![
                "/",
                "/components/button",
                "/docs/intro",
                "/docs/guides/setup",
                "/docs/guides",
            ]
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let storage = sample_storage();

        let first = build_tree(&storage, Path::new("/c")).unwrap();
        let second = build_tree(&storage, Path::new("/c")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root_builds_empty_tree() {
        let storage = MockStorage::new();

        let tree = build_tree(&storage, Path::new("/nowhere")).unwrap();

        assert_eq!(tree, ContentTreeNode::root());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_unreadable_file_aborts_build() {
        let storage = sample_storage().with_unreadable("/c/docs/guides/setup.mdx");

        let err = build_tree(&storage, Path::new("/c")).unwrap_err();

        assert_eq!(err.path(), Path::new("/c/docs/guides/setup.mdx"));
    }

    #[test]
    fn test_unlistable_subdirectory_is_skipped() {
        let storage = sample_storage().with_unlistable("/c/docs");

        let tree = build_tree(&storage, Path::new("/c")).unwrap();

        assert!(tree.subdirectories["docs"].is_empty());
        assert_eq!(tree.record_count(), 2);
    }

    #[test]
    fn test_find() {
        let tree = build_tree(&sample_storage(), Path::new("/c")).unwrap();

        assert_eq!(tree.find("").map(|n| n.name.as_str()), Some("root"));
        assert_eq!(tree.find("/").map(|n| n.name.as_str()), Some("root"));
        assert_eq!(
            tree.find("docs/guides").map(|n| n.path.as_str()),
            Some("docs/guides")
        );
        assert_eq!(
            tree.find("/docs/guides/").map(|n| n.path.as_str()),
            Some("docs/guides")
        );
        assert!(tree.find("docs/missing").is_none());
    }

    #[test]
    fn test_collections_and_summary() {
        let tree = build_tree(&sample_storage(), Path::new("/c")).unwrap();

        let collections = tree.collections();
        assert_eq!(
            collections.keys().collect::<Vec<_>>(),
            vec!["components", "docs"]
        );
        assert_eq!(
            collections["docs"]
                .iter()
                .map(|r| r.path.as_str())
                .collect::<Vec<_>>(),
            vec!["/docs/intro", "/docs/guides/setup", "/docs/guides"]
        );

        assert_eq!(
            tree.directory_summary(),
            BTreeMap::from([("components".to_owned(), 1), ("docs".to_owned(), 3)])
        );
    }

    #[test]
    fn test_serialized_shape() {
        let storage = MockStorage::new().with_file("/c/docs/a.mdx", "");
        let tree = build_tree(&storage, Path::new("/c")).unwrap();

        let value = serde_json::to_value(&tree).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "name": "root",
                "path": "",
                "contents": [],
                "subdirectories": {
                    "docs": {
                        "name": "docs",
                        "path": "docs",
                        "contents": [{
                            "name": "a",
                            "path": "/docs/a",
                            "file": "/c/docs/a.mdx",
                            "frontmatter": {}
                        }],
                        "subdirectories": {}
                    }
                }
            })
        );
    }

    #[test]
    fn test_build_tree_from_filesystem() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("docs/api")).unwrap();
        fs::write(root.join("docs/api/index.mdx"), "---\ntitle: API\n---\n").unwrap();
        fs::write(root.join("docs/api/auth.mdx"), "").unwrap();
        fs::write(root.join("docs/notes.txt"), "ignored").unwrap();

        let tree = build_tree(&FsStorage::new(), root).unwrap();

        let mut found: Vec<&str> = routes(&tree);
        found.sort_unstable();
        assert_eq!(found, vec!["/docs/api", "/docs/api/auth"]);

        let api = tree.find("docs/api").unwrap();
        assert_eq!(api.path, "docs/api");
        let index = api.contents.iter().find(|r| r.name == "index").unwrap();
        assert_eq!(index.source, root.join("docs/api/index.mdx"));
        assert_eq!(
            index.frontmatter.get("title"),
            Some(&serde_json::json!("API"))
        );
    }

    #[test]
    fn test_invalid_utf8_file_does_not_abort_build() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("good.mdx"), "---\ntitle: Good\n---\n").unwrap();
        fs::write(root.join("latin1.mdx"), b"---\ntitle: Latin\n---\ncaf\xe9").unwrap();

        let tree = build_tree(&FsStorage::new(), root).unwrap();

        let mut found: Vec<&str> = routes(&tree);
        found.sort_unstable();
        assert_eq!(found, vec!["/good", "/latin1"]);
        let latin1 = tree.contents.iter().find(|r| r.name == "latin1").unwrap();
        assert_eq!(
            latin1.frontmatter.get("title"),
            Some(&serde_json::json!("Latin"))
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_file_name_does_not_abort_build() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("good.mdx"), "").unwrap();
        fs::write(root.join(OsStr::from_bytes(b"caf\xe9.mdx")), "").unwrap();

        let tree = build_tree(&FsStorage::new(), root).unwrap();

        assert_eq!(routes(&tree), vec!["/good"]);
    }
}
