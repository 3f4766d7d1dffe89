//! Immutable result of one site build.

use std::collections::BTreeMap;

use quire_content::{
    ContentIndex, ContentRecord, ContentTreeNode, Manifest, NavigationItem, NavigationOptions,
    build_tree_navigation, directory_navigation,
};

/// Consistent view of the site produced by one successful build.
///
/// Tree, navigation and route index always come from the same scan.
/// Snapshots are never modified after they are published.
#[derive(Clone, Debug)]
pub struct SiteSnapshot {
    generation: u64,
    tree: ContentTreeNode,
    navigation: Vec<NavigationItem>,
    index: ContentIndex,
    options: NavigationOptions,
}

impl SiteSnapshot {
    /// Derive navigation and index from a content tree.
    #[must_use]
    pub fn new(generation: u64, tree: ContentTreeNode, options: NavigationOptions) -> Self {
        let navigation = build_tree_navigation(&tree, &options);
        let index = ContentIndex::new(&tree);
        Self {
            generation,
            tree,
            navigation,
            index,
            options,
        }
    }

    /// Snapshot of a site that has not been built yet.
    #[must_use]
    pub fn empty(options: NavigationOptions) -> Self {
        Self::new(0, ContentTreeNode::root(), options)
    }

    /// Build generation, 0 before the first build.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Content tree.
    #[must_use]
    pub fn tree(&self) -> &ContentTreeNode {
        &self.tree
    }

    /// Navigation tree.
    #[must_use]
    pub fn navigation(&self) -> &[NavigationItem] {
        &self.navigation
    }

    /// Flat navigation for one top-level directory.
    #[must_use]
    pub fn directory_navigation(&self, directory: &str) -> Vec<NavigationItem> {
        directory_navigation(&self.tree, directory, &self.options)
    }

    /// Find a record by route.
    #[must_use]
    pub fn find(&self, route: &str) -> Option<&ContentRecord> {
        self.index.find(route)
    }

    /// Flattened records per top-level directory.
    #[must_use]
    pub fn collections(&self) -> BTreeMap<String, Vec<ContentRecord>> {
        self.tree.collections()
    }

    /// Record count per top-level directory.
    #[must_use]
    pub fn directory_summary(&self) -> BTreeMap<String, usize> {
        self.tree.directory_summary()
    }

    /// Total number of records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.index.records().len()
    }

    /// Manifest for the rendering layer.
    #[must_use]
    pub fn manifest(&self) -> Manifest {
        Manifest::new(self.generation, self.tree.clone(), self.navigation.clone())
    }
}
