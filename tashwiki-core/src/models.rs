//! Content model structs for pages and the site index.

use crate::categories::CategoryRegistry;
use crate::config::END_SUFFIX;

/// A single page in the site
#[derive(Debug, Clone)]
pub struct Page {
    /// Canonical page name (e.g., "Main_Page")
    pub name: String,

    /// Label derived from the page name; this is what categories list
    pub label: String,

    /// Display title; the `title` field when present, otherwise the label
    pub title: String,

    /// Per-page author overriding the site author
    pub author: Option<String>,

    /// Template the page is rendered with
    pub template: String,

    /// Canonical labels of the categories this page declared
    pub categories: Vec<String>,

    /// Rendered HTML content
    pub content_html: String,

    /// Page names this page links to
    pub outgoing_links: Vec<String>,

    /// Page names linked from this page that do not exist
    pub missing_links: Vec<String>,
}

impl Page {
    /// Relative output path for this page (no leading slash)
    pub fn output_rel_path(&self) -> String {
        format!("{}{}", self.name, END_SUFFIX)
    }
}

/// Result of the collection phase of a site pass
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    /// Pages in traversal order
    pub pages: Vec<Page>,

    /// Every declared category; complete because the pass has finished
    pub categories: CategoryRegistry,
}

impl SiteIndex {
    pub fn find_by_name(&self, name: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.name == name)
    }

    /// Number of links pointing at pages that do not exist
    pub fn missing_link_count(&self) -> usize {
        self.pages.iter().map(|p| p.missing_links.len()).sum()
    }
}
