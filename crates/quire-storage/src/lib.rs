//! Storage abstraction for the Quire content pipeline.
//!
//! This crate provides a [`Storage`] trait that hides the host filesystem from
//! the content pipeline. The pipeline only needs three primitives:
//!
//! - **list** the direct entries of a directory
//! - **read** a file as text
//! - check whether a path **exists**
//!
//! Backends:
//! - `FsStorage` in the `quire-storage-fs` crate for real directories
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use quire_storage::{EntryKind, Storage};
//! use quire_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new();
//! for entry in storage.list(Path::new("content"))? {
//!     if entry.kind == EntryKind::Directory {
//!         println!("{}/", entry.name);
//!     }
//! }
//! ```

#[cfg(feature = "mock")]
mod mock;
mod storage;

#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};
