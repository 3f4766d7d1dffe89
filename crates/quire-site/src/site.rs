//! Site loading and snapshot publishing.
//!
//! [`Site`] builds [`SiteSnapshot`]s from a [`Storage`] backend and hands
//! them out as `Arc`s, so readers keep a consistent view while a rebuild is
//! in progress.
//!
//! # Thread Safety
//!
//! - `snapshot()` only clones an `Arc` under a read lock
//! - rebuilds are serialized by `reload_lock`
//! - `invalidate()` is lock-free (atomic counter)
//!
//! # Rebuild policy
//!
//! Every invalidation bumps the *requested* generation. A rebuild records the
//! requested generation when it starts and, on success, marks it as *built*.
//! An invalidation that arrives while a rebuild is running therefore stays
//! pending and triggers one more rebuild afterwards, and any number of
//! invalidations made while waiting for the lock are covered by a single
//! rebuild.
//!
//! Query methods ([`Site::find`], [`Site::navigation`], ...) rebuild a
//! pending generation once. If that rebuild fails they serve the last good
//! snapshot until the site is invalidated again; only
//! [`Site::reload_if_needed`], [`Site::rebuild`] and [`Site::refresh`] retry
//! a failed generation.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use quire_site::{Site, SiteConfig};
//! use quire_storage_fs::FsStorage;
//!
//! let site = Site::new(Arc::new(FsStorage::new()), SiteConfig::new("/srv/docs/content"));
//!
//! let snapshot = site.reload_if_needed()?;
//! let page = snapshot.find("/docs/installation");
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use quire_content::{
    ContentError, ContentRecord, ContentTreeNode, Manifest, NavigationItem, NavigationOptions,
    build_tree,
};
use quire_storage::Storage;

use crate::snapshot::SiteSnapshot;

/// Configuration for [`Site`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    /// Content root. Changes outside it are ignored by [`Site::refresh`].
    pub content_dir: PathBuf,
    /// Navigation options.
    pub navigation: NavigationOptions,
}

impl SiteConfig {
    /// Create a configuration with default navigation options.
    #[must_use]
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            navigation: NavigationOptions::default(),
        }
    }
}

/// Result of [`Site::refresh`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The changed path is outside the content root; nothing was rebuilt.
    Ignored,
    /// The site was rebuilt.
    Rebuilt {
        /// Generation of the published snapshot.
        generation: u64,
    },
}

/// Content site with atomically published snapshots.
pub struct Site {
    storage: Arc<dyn Storage>,
    config: SiteConfig,
    /// Serializes rebuilds.
    reload_lock: Mutex<()>,
    /// Current snapshot (atomically swappable).
    current: RwLock<Arc<SiteSnapshot>>,
    /// Latest requested generation.
    requested: AtomicU64,
    /// Generation of the current snapshot.
    built: AtomicU64,
    /// Last generation whose rebuild failed, 0 if none.
    failed: AtomicU64,
}

impl Site {
    /// Create a new site. Nothing is scanned until the first reload.
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage implementation for scanning and reading content
    /// * `config` - Site configuration
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: SiteConfig) -> Self {
        let initial = Arc::new(SiteSnapshot::empty(config.navigation));
        Self {
            storage,
            config,
            reload_lock: Mutex::new(()),
            current: RwLock::new(initial),
            requested: AtomicU64::new(1),
            built: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Current snapshot, without checking whether it is up-to-date.
    #[must_use]
    pub fn snapshot(&self) -> Arc<SiteSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Mark the site as outdated.
    ///
    /// The next [`Site::reload_if_needed`] rebuilds it. Current readers keep
    /// their snapshots.
    pub fn invalidate(&self) {
        self.requested.fetch_add(1, Ordering::AcqRel);
    }

    /// Rebuild the site unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the build fails. The previous snapshot
    /// stays published.
    pub fn rebuild(&self) -> Result<Arc<SiteSnapshot>, ContentError> {
        self.invalidate();
        self.reload_if_needed()
    }

    /// Rebuild the site if it was invalidated since the last build.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the build fails. The previous snapshot
    /// stays published and the next call retries.
    pub fn reload_if_needed(&self) -> Result<Arc<SiteSnapshot>, ContentError> {
        if self.is_current() {
            return Ok(self.snapshot());
        }

        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another thread may have covered our request while we waited
        if self.is_current() {
            return Ok(self.snapshot());
        }

        let target = self.requested.load(Ordering::Acquire);
        let started = Instant::now();

        let tree = match build_tree(self.storage.as_ref(), &self.config.content_dir) {
            Ok(tree) => tree,
            Err(e) => {
                self.failed.store(target, Ordering::Release);
                tracing::error!(
                    path = %self.config.content_dir.display(),
                    error = %e,
                    "Site rebuild failed, keeping previous snapshot"
                );
                return Err(e);
            }
        };

        let snapshot = Arc::new(SiteSnapshot::new(target, tree, self.config.navigation));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        self.built.store(target, Ordering::Release);

        tracing::info!(
            generation = target,
            records = snapshot.record_count(),
            elapsed_ms = started.elapsed().as_millis(),
            "Site rebuilt"
        );

        Ok(snapshot)
    }

    /// React to a change of `changed_path`.
    ///
    /// Paths outside the content root are ignored. Any other change rebuilds
    /// the whole site.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the rebuild fails.
    pub fn refresh(&self, changed_path: &Path) -> Result<RefreshOutcome, ContentError> {
        if !changed_path.starts_with(&self.config.content_dir) {
            tracing::debug!(path = %changed_path.display(), "Ignoring change outside content directory");
            return Ok(RefreshOutcome::Ignored);
        }

        tracing::debug!(path = %changed_path.display(), "Content changed");
        self.invalidate();
        let snapshot = self.reload_if_needed()?;
        Ok(RefreshOutcome::Rebuilt {
            generation: snapshot.generation(),
        })
    }

    /// Content tree.
    ///
    /// Reloads the site if needed.
    #[must_use]
    pub fn tree(&self) -> ContentTreeNode {
        self.current().tree().clone()
    }

    /// Navigation tree.
    ///
    /// Reloads the site if needed.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavigationItem> {
        self.current().navigation().to_vec()
    }

    /// Flat navigation for one top-level directory.
    ///
    /// Reloads the site if needed.
    #[must_use]
    pub fn directory_navigation(&self, directory: &str) -> Vec<NavigationItem> {
        self.current().directory_navigation(directory)
    }

    /// Flattened records per top-level directory.
    ///
    /// Reloads the site if needed.
    #[must_use]
    pub fn collections(&self) -> BTreeMap<String, Vec<ContentRecord>> {
        self.current().collections()
    }

    /// Record count per top-level directory.
    ///
    /// Reloads the site if needed.
    #[must_use]
    pub fn directory_summary(&self) -> BTreeMap<String, usize> {
        self.current().directory_summary()
    }

    /// Find a record by route.
    ///
    /// Reloads the site if needed.
    #[must_use]
    pub fn find(&self, route: &str) -> Option<ContentRecord> {
        self.current().find(route).cloned()
    }

    /// Manifest of the current snapshot.
    ///
    /// Reloads the site if needed.
    #[must_use]
    pub fn manifest(&self) -> Manifest {
        self.current().manifest()
    }

    fn is_current(&self) -> bool {
        self.built.load(Ordering::Acquire) >= self.requested.load(Ordering::Acquire)
    }

    /// Up-to-date snapshot, or the last good one if the rebuild fails.
    ///
    /// A generation that already failed is not rebuilt again here.
    fn current(&self) -> Arc<SiteSnapshot> {
        if self.failed.load(Ordering::Acquire) == self.requested.load(Ordering::Acquire) {
            return self.snapshot();
        }
        self.reload_if_needed().unwrap_or_else(|_| self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    // Ensure Site is Send + Sync for use with Arc
    static_assertions::assert_impl_all!(super::Site: Send, Sync);

    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;
    use std::thread;

    use pretty_assertions::assert_eq;
    use quire_storage::{Entry, MockStorage, StorageError};

    use super::*;

    const ROOT: &str = "/site/content";

    fn sample_storage() -> MockStorage {
        MockStorage::new()
            .with_file("/site/content/index.mdx", "---\ntitle: Home\n---\n")
            .with_file("/site/content/docs/intro.mdx", "---\ntitle: Intro\n---\n")
            .with_file("/site/content/docs/setup.mdx", "")
            .with_file("/site/content/components/button.tsx", "")
    }

    fn create_site(storage: Arc<dyn Storage>) -> Site {
        Site::new(storage, SiteConfig::new(ROOT))
    }

    /// Counts listings of the content root, one per build.
    struct CountingStorage {
        inner: MockStorage,
        builds: AtomicUsize,
    }

    impl Storage for CountingStorage {
        fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
            if dir == Path::new(ROOT) {
                self.builds.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.list(dir)
        }

        fn read(&self, path: &Path) -> Result<String, StorageError> {
            self.inner.read(path)
        }

        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }
    }

    /// Pauses the first listing of the content root until released.
    struct GatedStorage {
        inner: MockStorage,
        entered: Mutex<Option<mpsc::Sender<()>>>,
        release: Mutex<Option<mpsc::Receiver<()>>>,
    }

    impl Storage for GatedStorage {
        fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
            let result = self.inner.list(dir);
            if dir == Path::new(ROOT) {
                let entered = self.entered.lock().unwrap().take();
                let release = self.release.lock().unwrap().take();
                if let (Some(entered), Some(release)) = (entered, release) {
                    entered.send(()).unwrap();
                    release.recv().unwrap();
                }
            }
            result
        }

        fn read(&self, path: &Path) -> Result<String, StorageError> {
            self.inner.read(path)
        }

        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }
    }

    #[test]
    fn test_snapshot_before_first_build_is_empty() {
        let site = create_site(Arc::new(sample_storage()));

        let snapshot = site.snapshot();

        assert_eq!(snapshot.generation(), 0);
        assert!(snapshot.tree().is_empty());
        assert!(snapshot.navigation().is_empty());
    }

    #[test]
    fn test_reload_if_needed_builds_once() {
        let storage = Arc::new(CountingStorage {
            inner: sample_storage(),
            builds: AtomicUsize::new(0),
        });
        let site = create_site(storage.clone());

        let first = site.reload_if_needed().unwrap();
        let second = site.reload_if_needed().unwrap();

        assert_eq!(storage.builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.generation(), 1);
        assert_eq!(first.record_count(), 4);
    }

    #[test]
    fn test_invalidations_coalesce_into_one_rebuild() {
        let storage = Arc::new(CountingStorage {
            inner: sample_storage(),
            builds: AtomicUsize::new(0),
        });
        let site = create_site(storage.clone());
        site.reload_if_needed().unwrap();

        site.invalidate();
        site.invalidate();
        site.invalidate();
        let snapshot = site.reload_if_needed().unwrap();

        assert_eq!(storage.builds.load(Ordering::SeqCst), 2);
        assert_eq!(snapshot.generation(), 4);
    }

    #[test]
    fn test_invalidate_picks_up_changes() {
        let storage = Arc::new(sample_storage());
        let site = create_site(storage.clone());
        let before = site.reload_if_needed().unwrap();

        storage.set_file("/site/content/docs/faq.mdx", "---\ntitle: FAQ\n---\n");
        site.invalidate();
        let after = site.reload_if_needed().unwrap();

        assert!(before.find("/docs/faq").is_none());
        assert_eq!(
            after.find("/docs/faq").map(|r| r.name.as_str()),
            Some("faq")
        );
    }

    #[test]
    fn test_invalidate_during_rebuild_triggers_another_rebuild() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let storage = Arc::new(GatedStorage {
            inner: sample_storage(),
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(Some(release_rx)),
        });
        let site = Arc::new(create_site(storage.clone()));

        let handle = thread::spawn({
            let site = Arc::clone(&site);
            move || site.reload_if_needed().unwrap()
        });
        entered_rx.recv().unwrap();

        // The in-flight build has already listed the root
        storage.inner.set_file("/site/content/late.mdx", "");
        site.invalidate();
        release_tx.send(()).unwrap();

        let stale = handle.join().unwrap();
        assert_eq!(stale.generation(), 1);
        assert!(stale.find("/late").is_none());

        let fresh = site.reload_if_needed().unwrap();
        assert_eq!(fresh.generation(), 2);
        assert!(fresh.find("/late").is_some());
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_snapshot() {
        let storage = Arc::new(sample_storage());
        let site = create_site(storage.clone());
        let good = site.reload_if_needed().unwrap();

        storage.set_unreadable("/site/content/docs/setup.mdx", true);
        let err = site.rebuild().unwrap_err();

        assert_eq!(err.path(), Path::new("/site/content/docs/setup.mdx"));
        assert!(Arc::ptr_eq(&site.snapshot(), &good));
        // Queries fall back to the last good snapshot
        assert!(site.find("/docs/intro").is_some());

        storage.set_unreadable("/site/content/docs/setup.mdx", false);
        let recovered = site.reload_if_needed().unwrap();
        assert!(recovered.generation() > good.generation());
    }

    #[test]
    fn test_queries_do_not_retry_failed_generation() {
        let storage = Arc::new(CountingStorage {
            inner: sample_storage(),
            builds: AtomicUsize::new(0),
        });
        let site = create_site(storage.clone());
        site.reload_if_needed().unwrap();
        storage
            .inner
            .set_unreadable("/site/content/docs/setup.mdx", true);
        site.invalidate();

        // First query attempts the pending generation once
        assert!(site.find("/docs/intro").is_some());
        assert_eq!(storage.builds.load(Ordering::SeqCst), 2);

        assert!(site.find("/docs/intro").is_some());
        assert_eq!(site.navigation().len(), 3);
        assert_eq!(site.directory_summary().len(), 2);
        assert_eq!(storage.builds.load(Ordering::SeqCst), 2);

        // Explicit reloads still retry
        assert!(site.reload_if_needed().is_err());
        assert_eq!(storage.builds.load(Ordering::SeqCst), 3);

        // A new invalidation lets queries rebuild again
        storage
            .inner
            .set_unreadable("/site/content/docs/setup.mdx", false);
        site.invalidate();
        assert!(site.find("/docs/setup").is_some());
        assert_eq!(storage.builds.load(Ordering::SeqCst), 4);
        assert_eq!(site.snapshot().generation(), 3);
    }

    #[test]
    fn test_refresh_ignores_paths_outside_content() {
        let storage = Arc::new(CountingStorage {
            inner: sample_storage(),
            builds: AtomicUsize::new(0),
        });
        let site = create_site(storage.clone());
        site.reload_if_needed().unwrap();

        let outcome = site.refresh(Path::new("/site/src/app.tsx")).unwrap();

        assert_eq!(outcome, RefreshOutcome::Ignored);
        assert_eq!(storage.builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_refresh_rebuilds_for_content_changes() {
        let storage = Arc::new(sample_storage());
        let site = create_site(storage.clone());
        site.reload_if_needed().unwrap();

        storage.remove(Path::new("/site/content/components"));
        let outcome = site
            .refresh(Path::new("/site/content/components/button.tsx"))
            .unwrap();

        assert_eq!(outcome, RefreshOutcome::Rebuilt { generation: 2 });
        assert!(site.find("/components/button").is_none());
        assert_eq!(
            site.directory_summary(),
            BTreeMap::from([("docs".to_owned(), 2)])
        );
    }

    #[test]
    fn test_queries() {
        let site = create_site(Arc::new(sample_storage()));

        assert_eq!(
            site.find("docs/intro/").map(|r| r.path),
            Some("/docs/intro".to_owned())
        );
        assert_eq!(
            site.collections().keys().collect::<Vec<_>>(),
            vec!["components", "docs"]
        );
        assert_eq!(
            site.navigation()
                .iter()
                .map(|i| i.title.as_str())
                .collect::<Vec<_>>(),
            vec!["Home", "Components", "Docs"]
        );
        assert_eq!(
            site.directory_navigation("docs")
                .iter()
                .map(|i| i.href.as_str())
                .collect::<Vec<_>>(),
            vec!["/docs/intro", "/docs/setup"]
        );
        assert_eq!(site.tree().subdirectories.len(), 2);

        let manifest = site.manifest();
        assert_eq!(manifest.generation, 1);
        assert_eq!(manifest.entries.len(), 4);
    }

    #[test]
    fn test_navigation_options_are_applied() {
        let config = SiteConfig {
            content_dir: PathBuf::from(ROOT),
            navigation: NavigationOptions {
                group_by_category: true,
                ..NavigationOptions::default()
            },
        };
        let storage = MockStorage::new()
            .with_file("/site/content/docs/a.mdx", "---\ncategory: basics\n---\n")
            .with_file("/site/content/docs/b.mdx", "");
        let site = Site::new(Arc::new(storage), config);

        let items = site.directory_navigation("docs");

        assert_eq!(
            items.iter().map(|i| i.href.as_str()).collect::<Vec<_>>(),
            vec!["/docs/basics", "/docs/docs"]
        );
    }

    #[test]
    fn test_concurrent_invalidate_and_reload() {
        let site = Arc::new(create_site(Arc::new(sample_storage())));
        site.reload_if_needed().unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let site = Arc::clone(&site);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        site.invalidate();
                    } else {
                        let snapshot = site.reload_if_needed().unwrap();
                        // Snapshots are always complete
                        assert_eq!(snapshot.record_count(), 4);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let last = site.reload_if_needed().unwrap();
        assert_eq!(last.generation(), 6);
        assert_eq!(last.record_count(), 4);
    }
}
