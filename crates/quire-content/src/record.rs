//! Content records and the content file parser.

use std::path::{Component, Path, PathBuf};

use quire_storage::Storage;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::frontmatter::{Frontmatter, split_frontmatter};
use crate::route::{route_path, strip_content_extension};

/// Metadata of one content file.
///
/// Identity is the source file: two records are the same record only if they
/// come from the same file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// File path relative to its containing directory, extension stripped
    /// (e.g. "dark-mode").
    pub name: String,
    /// Route derived from the path relative to the content root
    /// (e.g. "/docs/dark-mode").
    pub path: String,
    /// Source file.
    #[serde(rename = "file")]
    pub source: PathBuf,
    /// Front-matter mapping (empty if absent or malformed).
    pub frontmatter: Frontmatter,
}

/// Read and parse one content file.
///
/// # Arguments
///
/// * `storage` - Storage backend to read from
/// * `file` - Content file
/// * `dir` - Directory containing the file (for the record name)
/// * `root` - Content root (for the route)
///
/// # Errors
///
/// Returns [`ContentError::Io`] if the file cannot be read. Malformed
/// front-matter is not an error: it is logged and replaced by an empty
/// mapping.
pub fn parse_content(
    storage: &dyn Storage,
    file: &Path,
    dir: &Path,
    root: &Path,
) -> Result<ContentRecord, ContentError> {
    let text = storage.read(file).map_err(|source| ContentError::Io {
        path: file.to_path_buf(),
        source,
    })?;

    let frontmatter = match split_frontmatter(&text) {
        Ok(split) => split.frontmatter,
        Err(e) => {
            tracing::warn!(path = %file.display(), error = %e, "Malformed front-matter, using empty metadata");
            Frontmatter::new()
        }
    };

    let name_path = relative_slash_path(file, dir);
    let name = strip_content_extension(&name_path)
        .unwrap_or(&name_path)
        .to_owned();
    let path = route_path(&relative_slash_path(file, root));

    Ok(ContentRecord {
        name,
        path,
        source: file.to_path_buf(),
        frontmatter,
    })
}

/// Path of `path` relative to `base`, joined with `/` on every platform.
///
/// Falls back to the whole path when `path` is not under `base`.
pub(crate) fn relative_slash_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
