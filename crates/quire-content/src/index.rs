//! Route lookup.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::record::ContentRecord;
use crate::route::normalize_route;
use crate::tree::ContentTreeNode;

/// Records of a content tree indexed by route.
#[derive(Clone, Debug, Default)]
pub struct ContentIndex {
    records: Vec<ContentRecord>,
    by_route: HashMap<String, usize>,
}

impl ContentIndex {
    /// Index every record of a tree.
    ///
    /// When two records share a route, the first in depth-first order wins.
    #[must_use]
    pub fn new(tree: &ContentTreeNode) -> Self {
        let records: Vec<ContentRecord> = tree.records().cloned().collect();
        let mut by_route = HashMap::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            match by_route.entry(record.path.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
                Entry::Occupied(slot) => {
                    let kept: &ContentRecord = &records[*slot.get()];
                    tracing::warn!(
                        route = %record.path,
                        kept = %kept.source.display(),
                        ignored = %record.source.display(),
                        "Duplicate route"
                    );
                }
            }
        }

        Self { records, by_route }
    }

    /// Find the record for a route.
    ///
    /// Leading and trailing slashes are optional.
    #[must_use]
    pub fn find(&self, route: &str) -> Option<&ContentRecord> {
        self.by_route
            .get(&normalize_route(route))
            .map(|&idx| &self.records[idx])
    }

    /// All indexed records, depth-first.
    #[must_use]
    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    /// Number of distinct routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_route.len()
    }

    /// Check if the index has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_route.is_empty()
    }
}
