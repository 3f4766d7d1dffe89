//! Content discovery for Quire.
//!
//! This crate turns a directory of `.mdx`/`.tsx` content files into:
//! - [`ContentTreeNode`]: the content tree mirroring the directory layout
//! - [`NavigationItem`] trees for the UI, flat or hierarchical
//! - [`ContentIndex`]: route lookup
//! - [`Manifest`]: a JSON document for the rendering layer
//!
//! All file access goes through a [`quire_storage::Storage`] backend.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use quire_content::{NavigationOptions, build_tree, build_tree_navigation};
//! use quire_storage_fs::FsStorage;
//!
//! let tree = build_tree(&FsStorage::new(), Path::new("content"))?;
//! let navigation = build_tree_navigation(&tree, &NavigationOptions::default());
//! # Ok(())
//! # }
//! ```

mod error;
mod frontmatter;
mod index;
mod manifest;
mod navigation;
mod record;
mod route;
mod scanner;
mod tree;

pub use error::{ContentError, ManifestError};
pub use frontmatter::{
    Frontmatter, FrontmatterError, FrontmatterSplit, parse_frontmatter, split_frontmatter,
    string_field,
};
pub use index::ContentIndex;
pub use manifest::{MANIFEST_VERSION, Manifest, ManifestEntry, write_manifest};
pub use navigation::{
    DEFAULT_CATEGORY, NavigationItem, NavigationOptions, build_flat, build_flat_in,
    build_tree_navigation, category_of, directory_navigation, humanize, resolve_title,
};
pub use record::{ContentRecord, parse_content};
pub use route::{
    CONTENT_EXTENSIONS, is_content_file, normalize_route, route_path, strip_content_extension,
};
pub use scanner::{DirectoryListing, scan_directory};
pub use tree::{ContentTreeNode, ROOT_NAME, Records, build_node, build_tree};
