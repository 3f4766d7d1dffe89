//! Site snapshots for Quire.
//!
//! This crate provides:
//! - [`Site`]: builds content snapshots from storage and republishes them
//!   when content changes
//! - [`SiteSnapshot`]: consistent tree, navigation and route index of one
//!   build
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use std::sync::Arc;
//! use quire_site::{Site, SiteConfig};
//! use quire_storage_fs::FsStorage;
//!
//! let site = Site::new(Arc::new(FsStorage::new()), SiteConfig::new("content"));
//!
//! let snapshot = site.reload_if_needed()?;
//! let navigation = snapshot.navigation();
//!
//! // After an editor saved a file
//! site.refresh(Path::new("content/docs/intro.mdx"))?;
//! # Ok(())
//! # }
//! ```

mod site;
mod snapshot;

pub use site::{RefreshOutcome, Site, SiteConfig};
pub use snapshot::SiteSnapshot;
