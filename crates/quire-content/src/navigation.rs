//! Navigation building.
//!
//! Two shapes are produced from content records:
//!
//! - **Flat**: one item per record, optionally sorted by title and grouped
//!   into one item per category ([`build_flat`], [`build_flat_in`]).
//! - **Tree**: items mirror the content tree; directories become items whose
//!   children are their contents ([`build_tree_navigation`]). Directories
//!   without content anywhere below them are left out.

use std::collections::HashMap;

use deunicode::deunicode;
use serde::{Deserialize, Serialize};
use unicase::UniCase;

use crate::frontmatter::string_field;
use crate::record::ContentRecord;
use crate::tree::ContentTreeNode;

/// Category of records that have neither a `category` field nor a nested
/// route.
pub const DEFAULT_CATEGORY: &str = "general";

/// Navigation item for the UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// Display title.
    pub title: String,
    /// Link target.
    pub href: String,
    /// Short description from front-matter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Child items. Never serialized when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationItem>,
}

impl NavigationItem {
    /// Create a leaf item.
    #[must_use]
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            description: None,
            children: Vec::new(),
        }
    }
}

/// Options controlling navigation shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationOptions {
    /// Sort items by resolved title.
    pub sort_by_title: bool,
    /// Group flat navigation by category.
    pub group_by_category: bool,
    /// Copy the `description` front-matter field into items.
    pub include_description: bool,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            sort_by_title: true,
            group_by_category: false,
            include_description: false,
        }
    }
}

/// Convert a slug to a display title.
///
/// Splits on `-`, `_` and spaces and capitalizes each word:
/// `"dark-mode"` -> `"Dark Mode"`. A slug without any word characters is
/// returned as is.
#[must_use]
pub fn humanize(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_first_into(word, &mut result);
    }
    if result.is_empty() {
        slug.to_owned()
    } else {
        result
    }
}

/// Display title of a record.
///
/// Uses the `title` front-matter field when it is a non-blank string,
/// otherwise the humanized last segment of the record name.
#[must_use]
pub fn resolve_title(record: &ContentRecord) -> String {
    if let Some(title) = string_field(&record.frontmatter, "title") {
        return title.to_owned();
    }
    let last = record.name.rsplit('/').next().unwrap_or(&record.name);
    humanize(last)
}

/// Category of a record for grouping.
///
/// The `category` front-matter field, else the first route segment of a
/// nested route, else [`DEFAULT_CATEGORY`].
#[must_use]
pub fn category_of(record: &ContentRecord) -> String {
    if let Some(category) = string_field(&record.frontmatter, "category") {
        return category.to_owned();
    }
    let mut segments = record.path.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(first), Some(_)) => first.to_owned(),
        _ => DEFAULT_CATEGORY.to_owned(),
    }
}

/// Build flat navigation from records.
///
/// Category item links are `/{category}`.
#[must_use]
pub fn build_flat(records: &[ContentRecord], options: &NavigationOptions) -> Vec<NavigationItem> {
    build_flat_in("", records, options)
}

/// Build flat navigation for the records of one directory.
///
/// Same as [`build_flat`], but category item links are
/// `/{directory}/{category}`.
#[must_use]
pub fn build_flat_in(
    directory: &str,
    records: &[ContentRecord],
    options: &NavigationOptions,
) -> Vec<NavigationItem> {
    let mut entries: Vec<(&ContentRecord, NavigationItem)> = records
        .iter()
        .map(|record| (record, record_item(record, options)))
        .collect();

    if options.sort_by_title {
        entries.sort_by_cached_key(|(_, item)| TitleKey::new(item));
    }

    if !options.group_by_category {
        return entries.into_iter().map(|(_, item)| item).collect();
    }

    let directory = directory.trim_matches('/');
    let mut groups: Vec<NavigationItem> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    for (record, item) in entries {
        let category = category_of(record);
        let idx = *group_index.entry(category.clone()).or_insert_with(|| {
            let href = if directory.is_empty() {
                format!("/{category}")
            } else {
                format!("/{directory}/{category}")
            };
            let mut title = String::with_capacity(category.len());
            capitalize_first_into(&category, &mut title);
            groups.push(NavigationItem::new(title, href));
            groups.len() - 1
        });
        groups[idx].children.push(item);
    }
    groups
}

/// Build tree navigation from a content tree node.
///
/// Content items come first, then one item per subdirectory in name order.
/// Category grouping does not apply here.
#[must_use]
pub fn build_tree_navigation(
    node: &ContentTreeNode,
    options: &NavigationOptions,
) -> Vec<NavigationItem> {
    let flat_options = NavigationOptions {
        group_by_category: false,
        ..*options
    };
    let mut items = build_flat(&node.contents, &flat_options);

    for (name, child) in &node.subdirectories {
        let children = build_tree_navigation(child, options);
        if children.is_empty() {
            continue;
        }
        items.push(NavigationItem {
            title: humanize(name),
            href: format!("/{}", child.path),
            description: None,
            children,
        });
    }

    items
}

/// Flat navigation for one directory of the tree.
///
/// Includes every record below the directory. Returns an empty list when the
/// directory does not exist or `directory` names the root.
#[must_use]
pub fn directory_navigation(
    tree: &ContentTreeNode,
    directory: &str,
    options: &NavigationOptions,
) -> Vec<NavigationItem> {
    let directory = directory.trim_matches('/');
    if directory.is_empty() {
        return Vec::new();
    }
    let Some(node) = tree.find(directory) else {
        return Vec::new();
    };
    let records: Vec<ContentRecord> = node.records().cloned().collect();
    build_flat_in(directory, &records, options)
}

fn record_item(record: &ContentRecord, options: &NavigationOptions) -> NavigationItem {
    let description = if options.include_description {
        string_field(&record.frontmatter, "description").map(str::to_owned)
    } else {
        None
    };
    NavigationItem {
        title: resolve_title(record),
        href: record.path.clone(),
        description,
        children: Vec::new(),
    }
}

/// Sort key of an item.
///
/// Titles are compared with accents transliterated and case folded, so
/// "Élan" sorts between "Apple" and "Zeta". Ties fall back to the
/// case-insensitive title, the exact title and the link.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TitleKey {
    folded: UniCase<String>,
    title: UniCase<String>,
    exact: String,
    href: String,
}

impl TitleKey {
    fn new(item: &NavigationItem) -> Self {
        Self {
            folded: UniCase::new(deunicode(&item.title)),
            title: UniCase::new(item.title.clone()),
            exact: item.title.clone(),
            href: item.href.clone(),
        }
    }
}

/// Capitalize the first character of a word, appending to `buf`.
fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}
