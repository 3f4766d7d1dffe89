//! Manifest consumed by the rendering layer.
//!
//! The manifest bundles everything a renderer needs in one JSON document:
//! the content tree, the navigation tree and one entry per content file
//! mapping its route to its source file and front-matter.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::frontmatter::Frontmatter;
use crate::navigation::NavigationItem;
use crate::tree::ContentTreeNode;

/// Manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Route entry of the manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Route.
    pub path: String,
    /// Source file to render for the route.
    pub file: PathBuf,
    /// Front-matter of the source file.
    pub meta: Frontmatter,
}

/// Serialized snapshot of a built site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Format version, always [`MANIFEST_VERSION`] when written by this crate.
    pub version: u32,
    /// Build generation the manifest was produced from.
    pub generation: u64,
    /// Content tree.
    pub tree: ContentTreeNode,
    /// Navigation tree.
    pub navigation: Vec<NavigationItem>,
    /// One entry per content file, depth-first.
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Create a manifest from a tree and its navigation.
    #[must_use]
    pub fn new(generation: u64, tree: ContentTreeNode, navigation: Vec<NavigationItem>) -> Self {
        let entries = tree
            .records()
            .map(|record| ManifestEntry {
                path: record.path.clone(),
                file: record.source.clone(),
                meta: record.frontmatter.clone(),
            })
            .collect();

        Self {
            version: MANIFEST_VERSION,
            generation,
            tree,
            navigation,
            entries,
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a front-matter value cannot be serialized.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Write a manifest as pretty JSON.
///
/// The file is written next to its destination first and then renamed, so
/// readers never see a partially written manifest. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns [`ManifestError`] if serialization or any filesystem operation
/// fails.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), ManifestError> {
    let mut json = manifest.to_json(true)?;
    json.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ManifestError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json).map_err(|source| ManifestError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), entries = manifest.entries.len(), "Wrote manifest");
    Ok(())
}
