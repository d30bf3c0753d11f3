//! Category accumulation across a site pass.
//!
//! Pages declare categories in their metadata. While the pass walks the
//! source tree every declaration is pushed into a [`CategoryRegistry`]; once
//! the walk is complete the registry is only read, to emit the category listing
//! and one page per category. Reading it before the walk finishes yields
//! partial membership lists.

use crate::naming::{canonical_label, encode_page_name, label_to_page_name};
use serde::Serialize;
use std::collections::HashMap;

/// A named group of pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Canonical label, also the identity of the category
    pub label: String,

    /// Titles of member pages in declaration order
    pub pages: Vec<String>,

    /// Output file relative to the output directory (e.g. `Category/C#.html`)
    pub path: String,

    /// Percent-encoded link relative to the base URL (e.g. `Category/C%23.html`)
    pub url: String,
}

impl Category {
    /// Record a member page. Duplicates are kept; the pass declares each page once.
    pub fn add_page(&mut self, title: impl Into<String>) {
        self.pages.push(title.into());
    }
}

/// Insertion-ordered map from category label to [`Category`]
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    prefix: String,
    end_suffix: String,
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategoryRegistry {
    /// Empty registry whose category pages live under `prefix/`.
    ///
    /// `prefix` is a label such as `Category`; an empty prefix places
    /// category pages at the site root.
    pub fn new(prefix: &str, end_suffix: &str) -> Self {
        Self {
            prefix: label_to_page_name(&canonical_label(prefix)),
            end_suffix: end_suffix.to_string(),
            categories: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Existing category for `label`, or a new empty one appended at the end.
    ///
    /// Labels are compared after [`canonical_label`], so `rust`, `Rust` and
    /// ` rust ` all name the same category.
    pub fn get_or_create(&mut self, label: &str) -> &mut Category {
        let label = canonical_label(label);
        let position = match self.index.get(&label) {
            Some(&position) => position,
            None => {
                let category = Category {
                    path: self.path_for(&label),
                    url: self.url_for(&label),
                    label: label.clone(),
                    pages: Vec::new(),
                };
                self.categories.push(category);
                let position = self.categories.len() - 1;
                self.index.insert(label, position);
                position
            }
        };
        &mut self.categories[position]
    }

    pub fn get(&self, label: &str) -> Option<&Category> {
        self.index
            .get(&canonical_label(label))
            .map(|&position| &self.categories[position])
    }

    /// Categories in first-seen order
    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn path_for(&self, label: &str) -> String {
        let name = label_to_page_name(label);
        self.join_prefix(&self.prefix, &name)
    }

    fn url_for(&self, label: &str) -> String {
        let name = encode_page_name(&label_to_page_name(label));
        self.join_prefix(&encode_page_name(&self.prefix), &name)
    }

    fn join_prefix(&self, prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            format!("{}{}", name, self.end_suffix)
        } else {
            format!("{}/{}{}", prefix, name, self.end_suffix)
        }
    }
}

impl<'a> IntoIterator for &'a CategoryRegistry {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
