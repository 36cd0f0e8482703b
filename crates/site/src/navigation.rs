//! Sidebar resolution, prev/next links and the doc footer.

use crate::config::ThemeConfig;
use crate::routes::RouteRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One sidebar entry, possibly a group of further entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarItem {
    /// Label.
    pub text: String,
    /// Target route, absent for pure groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SidebarItem>,
    /// Whether the group starts collapsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl SidebarItem {
    /// A leaf entry.
    pub fn link(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(link.into()),
            items: Vec::new(),
            collapsed: None,
        }
    }

    /// A group entry without a link of its own.
    pub fn group(text: impl Into<String>, items: Vec<SidebarItem>) -> Self {
        Self {
            text: text.into(),
            link: None,
            items,
            collapsed: None,
        }
    }
}

/// Sidebar as configured: one list for every page, or lists keyed by URL prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidebarConfig {
    /// The same sidebar on every page.
    Global(Vec<SidebarItem>),
    /// Section sidebars keyed by URL prefix such as `/guide/`.
    Sections(BTreeMap<String, Vec<SidebarItem>>),
}

impl SidebarConfig {
    /// The sidebar shown on `path`.
    pub fn resolve(&self, path: &str) -> &[SidebarItem] {
        match self {
            SidebarConfig::Global(items) => items,
            SidebarConfig::Sections(sections) => resolve_sidebar(sections, path),
        }
    }
}

/// Picks the section whose prefix is the longest match for `path`.
///
/// A key matches when `path` equals the key without its trailing slash or
/// continues it with `/`. No match yields an empty sidebar.
pub fn resolve_sidebar<'a>(
    sections: &'a BTreeMap<String, Vec<SidebarItem>>,
    path: &str,
) -> &'a [SidebarItem] {
    let mut keys: Vec<&String> = sections.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()));

    for key in keys {
        let prefix = key.strip_suffix('/').unwrap_or(key);
        let matches = path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'));
        if matches {
            return &sections[key];
        }
    }
    &[]
}

/// A sidebar leaf with a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Label.
    pub text: String,
    /// Target route.
    pub link: String,
}

/// Linked entries in reading order: a group's own link comes before its children.
pub fn flatten_sidebar(items: &[SidebarItem]) -> Vec<NavLink> {
    let mut links = Vec::new();
    collect_links(items, &mut links);
    links
}

fn collect_links(items: &[SidebarItem], links: &mut Vec<NavLink>) {
    for item in items {
        if let Some(link) = &item.link {
            links.push(NavLink {
                text: item.text.clone(),
                link: link.clone(),
            });
        }
        collect_links(&item.items, links);
    }
}

/// Neighbours of a page in the flattened sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevNext {
    /// Previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<NavLink>,
    /// Next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NavLink>,
}

/// Prev/next links for `path`; both empty when the page is not in the sidebar.
pub fn prev_next(path: &str, sidebar: &[SidebarItem]) -> PrevNext {
    let links = flatten_sidebar(sidebar);
    let Some(index) = links.iter().position(|link| link.link == path) else {
        return PrevNext::default();
    };
    PrevNext {
        prev: index.checked_sub(1).and_then(|i| links.get(i)).cloned(),
        next: links.get(index + 1).cloned(),
    }
}

/// Substitutes `:path` in an edit-link pattern, verbatim.
///
/// ```
/// use leaf_site::navigation::edit_link_url;
///
/// let url = edit_link_url("https://github.com/org/repo/edit/main/docs/:path", "guide/intro.md");
/// assert_eq!(url, "https://github.com/org/repo/edit/main/docs/guide/intro.md");
/// ```
pub fn edit_link_url(pattern: &str, relative_path: &str) -> String {
    pattern.replace(":path", relative_path)
}

/// The "edit this page" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLink {
    /// Resolved URL.
    pub url: String,
    /// Link text.
    pub text: String,
}

/// Footer data for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocFooterData {
    /// Previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<NavLink>,
    /// Next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NavLink>,
    /// Edit link, when an edit-link pattern is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<EditLink>,
    /// Whether the page shows its last-updated time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<bool>,
}

/// Computes the footer for a route from the theme config.
pub fn doc_footer(route: &RouteRecord, theme: &ThemeConfig) -> DocFooterData {
    let sidebar = theme
        .sidebar
        .as_ref()
        .map(|sidebar| sidebar.resolve(&route.url_path))
        .unwrap_or_default();
    let PrevNext { prev, next } = prev_next(&route.url_path, sidebar);
    let edit_link = theme.edit_link.as_ref().map(|edit| EditLink {
        url: edit_link_url(&edit.pattern, &route.relative_path),
        text: edit.text.clone(),
    });

    DocFooterData {
        prev,
        next,
        edit_link,
        last_updated: theme.last_updated.then_some(true),
    }
}
