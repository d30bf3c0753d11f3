//! Metadata block parsing and validation.
//!
//! A document may start with `key: value` lines, optionally fenced by `---`:
//!
//! ```text
//! title: Rust notes
//! categories: Programming, Languages
//!     Systems
//!
//! Body starts after the first blank line.
//! ```
//!
//! Keys are case-insensitive. Lines indented by four or more spaces add another
//! value to the previous key. The block ends at a blank line, a closing fence,
//! or the first line that is neither a field nor a continuation.

use crate::naming::{canonical_label, is_safe_page_name, label_to_page_name};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetaError {
    #[error("Unknown meta field '{0}'.")]
    UnknownField(String),

    #[error("Template '{0}' not found.")]
    TemplateNotFound(String),

    #[error("Category '{0}' cannot be used as a file name.")]
    InvalidCategory(String),
}

/// Source of template names a page may select with `template:`
pub trait TemplateCatalog {
    fn has_template(&self, name: &str) -> bool;
}

impl<T: AsRef<str>> TemplateCatalog for [T] {
    fn has_template(&self, name: &str) -> bool {
        self.iter().any(|t| t.as_ref() == name)
    }
}

impl<T: AsRef<str>, const N: usize> TemplateCatalog for [T; N] {
    fn has_template(&self, name: &str) -> bool {
        self.as_slice().has_template(name)
    }
}

/// Metadata exactly as written, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMeta {
    entries: Vec<(String, Vec<String>)>,
}

impl RawMeta {
    /// Append a value; repeated keys accumulate
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }
}

/// Validated page metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub template: Option<String>,
    /// Canonical category labels in declaration order
    pub categories: Vec<String>,
}

static FIELD_REGEX: OnceLock<Regex> = OnceLock::new();
static CONTINUATION_REGEX: OnceLock<Regex> = OnceLock::new();
static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn field_regex() -> &'static Regex {
    FIELD_REGEX.get_or_init(|| {
        Regex::new(r"^[ ]{0,3}(?P<key>[A-Za-z0-9_-]+):\s*(?P<value>.*)$").expect("valid regex")
    })
}

fn continuation_regex() -> &'static Regex {
    CONTINUATION_REGEX
        .get_or_init(|| Regex::new(r"^[ ]{4,}(?P<value>.*)$").expect("valid regex"))
}

fn fence_regex() -> &'static Regex {
    FENCE_REGEX.get_or_init(|| Regex::new(r"^(-{3}|\.{3})(\s.*)?$").expect("valid regex"))
}

/// Split a document into its metadata block and markdown body.
///
/// Documents without a metadata block return empty metadata and the full text.
///
/// ```
/// use tashwiki_core::meta::parse_metadata;
///
/// let (meta, body) = parse_metadata("title: Home\nauthor: Tash\n\n# Welcome\n");
/// assert_eq!(meta.get("title"), Some(&["Home".to_string()][..]));
/// assert_eq!(body, "# Welcome\n");
/// ```
pub fn parse_metadata(content: &str) -> (RawMeta, &str) {
    let mut meta = RawMeta::default();
    let mut rest = content;
    let mut current_key: Option<String> = None;

    if let Some((first, after)) = split_line(rest) {
        if first.starts_with("---") && fence_regex().is_match(first) {
            rest = after;
        }
    }

    while let Some((line, after)) = split_line(rest) {
        if line.trim().is_empty() || fence_regex().is_match(line) {
            rest = after;
            break;
        }

        if let Some(caps) = field_regex().captures(line) {
            let key = caps["key"].to_lowercase();
            meta.push(&key, caps["value"].trim());
            current_key = Some(key);
        } else if let (Some(caps), Some(key)) =
            (continuation_regex().captures(line), current_key.as_deref())
        {
            meta.push(key, caps["value"].trim());
        } else {
            break;
        }

        rest = after;
    }

    (meta, rest)
}

/// Yields the first line without its terminator, and the text after it
fn split_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.find('\n') {
        Some(pos) => Some((text[..pos].trim_end_matches('\r'), &text[pos + 1..])),
        None => Some((text, "")),
    }
}

/// Check every field and convert the raw block into [`PageMeta`].
///
/// Unknown keys, templates missing from `catalog` and categories that would not
/// make a plain file name (`..`, path separators) are fatal.
pub fn validate_meta<C>(raw: &RawMeta, catalog: &C) -> Result<PageMeta, MetaError>
where
    C: TemplateCatalog + ?Sized,
{
    let mut meta = PageMeta::default();

    for (key, values) in raw.iter() {
        match key {
            "title" => meta.title = first_value(values),
            "author" => meta.author = first_value(values),
            "template" => {
                let template = values.first().map(|v| v.trim()).unwrap_or_default();
                if !catalog.has_template(template) {
                    return Err(MetaError::TemplateNotFound(template.to_string()));
                }
                meta.template = Some(template.to_string());
            }
            "categories" => {
                for category in values
                    .iter()
                    .flat_map(|v| v.split(','))
                    .map(canonical_label)
                    .filter(|c| !c.is_empty())
                {
                    if !is_safe_page_name(&label_to_page_name(&category)) {
                        return Err(MetaError::InvalidCategory(category));
                    }
                    meta.categories.push(category);
                }
            }
            other => return Err(MetaError::UnknownField(other.to_string())),
        }
    }

    Ok(meta)
}

fn first_value(values: &[String]) -> Option<String> {
    values
        .first()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
