//! Route derivation from content file paths.
//!
//! A route is the URL a content file is served under. Routes always start
//! with `/` and never end with `/` except for the root route itself.
//!
//! Examples:
//! - `docs/installation.mdx` -> `/docs/installation`
//! - `docs/index.mdx` -> `/docs`
//! - `index.mdx` -> `/`
//! - `a/b/c/index.tsx` -> `/a/b/c`

/// File extensions recognized as content.
pub const CONTENT_EXTENSIONS: [&str; 2] = ["mdx", "tsx"];

/// Strip a recognized content extension from a file name or path.
///
/// Returns `None` if the input does not end in a recognized extension.
#[must_use]
pub fn strip_content_extension(path: &str) -> Option<&str> {
    CONTENT_EXTENSIONS.iter().find_map(|ext| {
        let stem = path.strip_suffix(ext)?.strip_suffix('.')?;
        // ".mdx" alone has no stem
        (!stem.is_empty() && !stem.ends_with('/')).then_some(stem)
    })
}

/// Check if a file name has a recognized content extension.
#[must_use]
pub fn is_content_file(name: &str) -> bool {
    strip_content_extension(name).is_some()
}

/// Convert a content-root-relative file path to its route.
///
/// `relative_path` uses `/` separators. Paths without a recognized
/// extension are returned unchanged.
#[must_use]
pub fn route_path(relative_path: &str) -> String {
    let Some(without_ext) = strip_content_extension(relative_path) else {
        return relative_path.to_owned();
    };

    // Index files map to their directory. Repeated so that a directory
    // literally named "index" cannot leave "/index" as the last segment.
    let mut path_part = without_ext;
    loop {
        if path_part == "index" {
            path_part = "";
        } else if let Some(without_index) = path_part.strip_suffix("/index") {
            path_part = without_index;
            continue;
        }
        break;
    }

    let trimmed = path_part.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Normalize a route for lookups.
///
/// Accepts routes with or without a leading `/` and with trailing slashes:
/// `"docs/intro/"` -> `"/docs/intro"`, `""` -> `"/"`.
#[must_use]
pub fn normalize_route(route: &str) -> String {
    let trimmed = route.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_path_examples() {
        assert_eq!(route_path("docs/installation.mdx"), "/docs/installation");
        assert_eq!(route_path("docs/index.mdx"), "/docs");
        assert_eq!(route_path("index.mdx"), "/");
        assert_eq!(route_path("a/b/c/index.tsx"), "/a/b/c");
    }

    #[test]
    fn test_route_path_tsx() {
        assert_eq!(route_path("components/button.tsx"), "/components/button");
        assert_eq!(route_path("index.tsx"), "/");
    }

    #[test]
    fn test_route_path_keeps_index_like_segments() {
        assert_eq!(route_path("index/guide.mdx"), "/index/guide");
        assert_eq!(route_path("docs/index-page.mdx"), "/docs/index-page");
        assert_eq!(route_path("docs/reindex.mdx"), "/docs/reindex");
    }

    #[test]
    fn test_route_path_collapses_nested_index_segments() {
        assert_eq!(route_path("index/index.mdx"), "/");
        assert_eq!(route_path("a/index/index.mdx"), "/a");
        assert_eq!(route_path("index/guide/index.tsx"), "/index/guide");
    }

    #[test]
    fn test_route_path_only_strips_final_extension() {
        assert_eq!(route_path("docs/v1.mdx.mdx"), "/docs/v1.mdx");
        assert_eq!(route_path("notes.tsx.mdx"), "/notes.tsx");
    }

    #[test]
    fn test_route_path_unrecognized_passes_through() {
        assert_eq!(route_path("docs/readme.md"), "docs/readme.md");
        assert_eq!(route_path("docs/intro"), "docs/intro");
        assert_eq!(route_path(""), "");
    }

    #[test]
    fn test_route_invariants() {
        let inputs = [
            "index.mdx",
            "a.mdx",
            "a/index.mdx",
            "a/b.tsx",
            "a/b/index.tsx",
            "a/index/index.mdx",
            "deep/er/still/index.mdx",
            "x-y/z_w.mdx",
        ];

        for input in inputs {
            let route = route_path(input);
            assert!(route.starts_with('/'), "{input} -> {route}");
            assert!(route == "/" || !route.ends_with('/'), "{input} -> {route}");
            assert!(!route.ends_with("/index"), "{input} -> {route}");
        }
    }

    #[test]
    fn test_strip_content_extension() {
        assert_eq!(strip_content_extension("guide.mdx"), Some("guide"));
        assert_eq!(strip_content_extension("button.tsx"), Some("button"));
        assert_eq!(strip_content_extension("a/b.mdx"), Some("a/b"));
        assert_eq!(strip_content_extension("guide.md"), None);
        assert_eq!(strip_content_extension("guidemdx"), None);
        assert_eq!(strip_content_extension(".mdx"), None);
        assert_eq!(strip_content_extension("a/.mdx"), None);
    }

    #[test]
    fn test_is_content_file() {
        assert!(is_content_file("intro.mdx"));
        assert!(is_content_file("card.tsx"));
        assert!(!is_content_file("styles.css"));
        assert!(!is_content_file("intro.MDX.bak"));
    }

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route("/docs/intro"), "/docs/intro");
        assert_eq!(normalize_route("docs/intro"), "/docs/intro");
        assert_eq!(normalize_route("/docs/intro/"), "/docs/intro");
        assert_eq!(normalize_route(""), "/");
        assert_eq!(normalize_route("/"), "/");
    }
}
