//! Route manifest node types.

use serde::{Deserialize, Serialize};

use crate::flatten::normalize_href;

/// A node in the navigation tree.
///
/// Serialized as `{ "title", "href", "noLink"?, "items"? }`. `noLink` is
/// omitted when false and `items` when the node is a leaf, so the persisted
/// manifest stays close to what a person would write by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    /// Display title.
    pub title: String,
    /// Path segment. Root entries carry an absolute path; children a segment
    /// relative to their parent.
    pub href: String,
    /// Pure grouping node, excluded from the flattened page list.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_link: bool,
    /// Children. `None` marks a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<RouteEntry>>,
}

impl RouteEntry {
    /// Create a navigable leaf entry.
    #[must_use]
    pub fn link(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            no_link: false,
            items: None,
        }
    }

    /// Create an empty grouping entry (`noLink`).
    #[must_use]
    pub fn group(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            no_link: true,
            items: Some(Vec::new()),
        }
    }

    /// Attach children.
    #[must_use]
    pub fn with_items(mut self, items: Vec<RouteEntry>) -> Self {
        self.items = Some(items);
        self
    }

    /// True if the entry has no `items` list.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.items.is_none()
    }

    /// Children, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[RouteEntry] {
        self.items.as_deref().unwrap_or_default()
    }

    /// Direct child whose href normalizes to the same value as `href`.
    #[must_use]
    pub fn child_by_href(&self, href: &str) -> Option<&RouteEntry> {
        let wanted = normalize_href(href)?;
        self.children()
            .iter()
            .find(|child| normalize_href(&child.href).as_deref() == Some(wanted.as_str()))
    }
}

/// A navigable page produced by flattening the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Display title.
    pub title: String,
    /// Effective href (ancestor hrefs joined with the entry's own).
    pub href: String,
}

impl Page {
    /// Slug segments of the href, without the leading empty segment.
    ///
    /// `"/chapters/optics"` gives `["chapters", "optics"]`; `"/"` gives `[]`.
    #[must_use]
    pub fn slug_segments(&self) -> Vec<&str> {
        self.href.split('/').filter(|s| !s.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serialize_leaf_omits_optional_fields() {
        let entry = RouteEntry::link("Optics", "/optics");

        let json = serde_json::to_string(&entry).unwrap();

        assert_eq!(json, r#"{"title":"Optics","href":"/optics"}"#);
    }

    #[test]
    fn test_serialize_group_uses_camel_case() {
        let entry = RouteEntry::group("Chapters", "/chapters")
            .with_items(vec![RouteEntry::link("Optics", "/optics")]);

        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["noLink"], serde_json::Value::Bool(true));
        assert_eq!(json["items"][0]["href"], "/optics");
    }

    #[test]
    fn test_deserialize_hand_written_manifest() {
        let json = r#"[
            {"title": "Getting Started", "href": "/getting-started", "noLink": true,
             "items": [{"title": "Introduction", "href": "/introduction"}]}
        ]"#;

        let routes: Vec<RouteEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(routes.len(), 1);
        assert!(routes[0].no_link);
        assert_eq!(routes[0].children()[0].title, "Introduction");
        assert!(routes[0].children()[0].is_leaf());
    }

    #[test]
    fn test_child_by_href() {
        let group = RouteEntry::group("Chapters", "/chapters")
            .with_items(vec![RouteEntry::link("Optics", "/optics")]);

        assert_eq!(group.child_by_href("/optics").unwrap().title, "Optics");
        assert_eq!(group.child_by_href("optics/").unwrap().title, "Optics");
        assert!(group.child_by_href("/waves").is_none());
        assert!(group.child_by_href("/").is_none());
        assert!(RouteEntry::link("Leaf", "/leaf").children().is_empty());
    }

    #[test]
    fn test_page_slug_segments() {
        let page = Page {
            title: "Optics".to_owned(),
            href: "/chapters/optics".to_owned(),
        };
        assert_eq!(page.slug_segments(), vec!["chapters", "optics"]);

        let root = Page {
            title: "Home".to_owned(),
            href: "/".to_owned(),
        };
        assert!(root.slug_segments().is_empty());
    }
}
