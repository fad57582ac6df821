//! Flattening the route tree into navigable pages.
//!
//! Two policies exist for child hrefs:
//!
//! - [`flatten`] (the one every consumer uses): a child's effective href is
//!   its parent's effective href joined with its own, at any depth.
//! - [`flatten_verbatim`]: every entry contributes its own href unchanged.
//!
//! Both walk depth-first, skip `noLink` entries, and still descend into the
//! children of skipped entries.

use crate::entry::{Page, RouteEntry};

/// Flatten the tree, accumulating ancestor hrefs.
///
/// With `Chapters (/chapters, noLink) -> Optics (/optics)` the result is a
/// single page `Optics -> /chapters/optics`.
#[must_use]
pub fn flatten(entries: &[RouteEntry]) -> Vec<Page> {
    let mut pages = Vec::new();
    for entry in entries {
        collect_joined(entry, &entry.href, &mut pages);
    }
    pages
}

fn collect_joined(entry: &RouteEntry, effective_href: &str, pages: &mut Vec<Page>) {
    if !entry.no_link {
        pages.push(Page {
            title: entry.title.clone(),
            href: effective_href.to_owned(),
        });
    }
    for child in entry.children() {
        let child_href = join_href(effective_href, &child.href);
        collect_joined(child, &child_href, pages);
    }
}

/// Flatten the tree using each entry's own href.
#[must_use]
pub fn flatten_verbatim(entries: &[RouteEntry]) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut stack: Vec<&RouteEntry> = entries.iter().rev().collect();
    while let Some(entry) = stack.pop() {
        if !entry.no_link {
            pages.push(Page {
                title: entry.title.clone(),
                href: entry.href.clone(),
            });
        }
        stack.extend(entry.children().iter().rev());
    }
    pages
}

/// Join a parent href and a child href with exactly one `/` between them.
///
/// Slashes around the child are ignored, so a child of only slashes yields
/// the parent unchanged. An empty parent yields the child rooted at `/`.
///
/// ```
/// use folio_routes::join_href;
///
/// assert_eq!(join_href("/", "/optics"), "/optics");
/// assert_eq!(join_href("/chapters", "/optics"), "/chapters/optics");
/// assert_eq!(join_href("/chapters/", "optics/"), "/chapters/optics");
/// assert_eq!(join_href("/chapters", "/"), "/chapters");
/// ```
#[must_use]
pub fn join_href(parent: &str, child: &str) -> String {
    let child = child.trim_matches('/');
    if child.is_empty() {
        return parent.to_owned();
    }
    if parent.is_empty() {
        return format!("/{child}");
    }
    format!("{}/{child}", parent.trim_end_matches('/'))
}

/// Canonical form of a child href: a single leading `/` and no trailing `/`.
///
/// Returns `None` if nothing but whitespace and slashes remains.
///
/// ```
/// use folio_routes::normalize_href;
///
/// assert_eq!(normalize_href("optics/").as_deref(), Some("/optics"));
/// assert_eq!(normalize_href("/"), None);
/// ```
#[must_use]
pub fn normalize_href(href: &str) -> Option<String> {
    let trimmed = href.trim().trim_matches('/');
    (!trimmed.is_empty()).then(|| format!("/{trimmed}"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(title: &str, href: &str) -> Page {
        Page {
            title: title.to_owned(),
            href: href.to_owned(),
        }
    }

    /// Getting Started (group) > Introduction, Installation
    /// Chapters (group)        > Optics > Lenses
    /// About
    fn sample_tree() -> Vec<RouteEntry> {
        vec![
            RouteEntry::group("Getting Started", "/getting-started").with_items(vec![
                RouteEntry::link("Introduction", "/introduction"),
                RouteEntry::link("Installation", "/installation"),
            ]),
            RouteEntry::group("Chapters", "/chapters").with_items(vec![
                RouteEntry::link("Optics", "/optics")
                    .with_items(vec![RouteEntry::link("Lenses", "/lenses")]),
            ]),
            RouteEntry::link("About", "/about"),
        ]
    }

    #[test]
    fn test_flatten_joins_ancestor_hrefs() {
        let pages = flatten(&sample_tree());

        assert_eq!(
            pages,
            vec![
                page("Introduction", "/getting-started/introduction"),
                page("Installation", "/getting-started/installation"),
                page("Optics", "/chapters/optics"),
                page("Lenses", "/chapters/optics/lenses"),
                page("About", "/about"),
            ]
        );
    }

    #[test]
    fn test_flatten_verbatim_keeps_own_hrefs() {
        let pages = flatten_verbatim(&sample_tree());

        assert_eq!(
            pages,
            vec![
                page("Introduction", "/introduction"),
                page("Installation", "/installation"),
                page("Optics", "/optics"),
                page("Lenses", "/lenses"),
                page("About", "/about"),
            ]
        );
    }

    #[test]
    fn test_flatten_policies_agree_on_flat_trees() {
        let tree = vec![
            RouteEntry::link("A", "/a"),
            RouteEntry::link("B", "/b"),
        ];

        assert_eq!(flatten(&tree), flatten_verbatim(&tree));
    }

    #[test]
    fn test_flatten_excludes_every_no_link_entry() {
        let mut nested_group = RouteEntry::group("Inner", "/inner");
        nested_group.items = Some(vec![RouteEntry::link("Deep", "/deep")]);
        let tree = vec![RouteEntry::group("Outer", "/outer").with_items(vec![nested_group])];

        let pages = flatten(&tree);

        assert_eq!(pages, vec![page("Deep", "/outer/inner/deep")]);
    }

    #[test]
    fn test_flatten_includes_each_linked_entry_once() {
        let tree = sample_tree();

        let pages = flatten(&tree);

        let linked = count_linked(&tree);
        assert_eq!(pages.len(), linked);
    }

    fn count_linked(entries: &[RouteEntry]) -> usize {
        entries
            .iter()
            .map(|e| usize::from(!e.no_link) + count_linked(e.children()))
            .sum()
    }

    #[test]
    fn test_flatten_linked_parent_precedes_children() {
        let tree = vec![
            RouteEntry::link("Guide", "/guide")
                .with_items(vec![RouteEntry::link("Setup", "/setup")]),
        ];

        let pages = flatten(&tree);

        assert_eq!(
            pages,
            vec![page("Guide", "/guide"), page("Setup", "/guide/setup")]
        );
    }

    #[test]
    fn test_flatten_root_group_href() {
        let tree = vec![
            RouteEntry::group("Chapters", "/")
                .with_items(vec![RouteEntry::link("Optics", "/optics")]),
        ];

        assert_eq!(flatten(&tree), vec![page("Optics", "/optics")]);
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten(&[]).is_empty());
        assert!(flatten_verbatim(&[]).is_empty());
    }

    #[test]
    fn test_join_href() {
        assert_eq!(join_href("/", "/optics"), "/optics");
        assert_eq!(join_href("/chapters", "/optics"), "/chapters/optics");
        assert_eq!(join_href("/chapters/", "/optics"), "/chapters/optics");
        assert_eq!(join_href("/chapters", "optics"), "/chapters/optics");
        assert_eq!(join_href("/chapters", ""), "/chapters");
        assert_eq!(join_href("", "/optics"), "/optics");
    }

    #[test]
    fn test_join_href_ignores_trailing_slashes() {
        assert_eq!(join_href("/chapters", "/optics/"), "/chapters/optics");
        assert_eq!(join_href("/chapters", "/"), "/chapters");
        assert_eq!(join_href("/chapters", "//"), "/chapters");
    }

    #[test]
    fn test_normalize_href() {
        assert_eq!(normalize_href("/optics").as_deref(), Some("/optics"));
        assert_eq!(normalize_href("optics").as_deref(), Some("/optics"));
        assert_eq!(normalize_href("/optics/").as_deref(), Some("/optics"));
        assert_eq!(normalize_href(" //waves/light// ").as_deref(), Some("/waves/light"));
        assert_eq!(normalize_href("/"), None);
        assert_eq!(normalize_href(""), None);
        assert_eq!(normalize_href("  "), None);
    }
}
