//! Wikilink transformation for [[target]] and [[target|text]] syntax.

use super::{html_escape, EventTransformer, LinkReport};
use crate::naming::{canonical_label, encode_page_name, label_to_page_name};
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use std::collections::HashSet;

/// Class added to anchors whose target page does not exist
pub const NOT_FOUND_CLASS: &str = "notfound";

/// Answers whether a page with the given label exists in the site
pub trait PageExists {
    fn page_exists(&self, label: &str) -> bool;
}

impl<F> PageExists for F
where
    F: Fn(&str) -> bool,
{
    fn page_exists(&self, label: &str) -> bool {
        self(label)
    }
}

/// Set of canonical page names discovered before conversion starts.
#[derive(Debug, Clone, Default)]
pub struct KnownPages {
    names: HashSet<String>,
}

impl KnownPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canonical page name. Returns false if it was already present.
    pub fn insert(&mut self, page_name: impl Into<String>) -> bool {
        self.names.insert(page_name.into())
    }

    pub fn contains_name(&self, page_name: &str) -> bool {
        self.names.contains(page_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl PageExists for KnownPages {
    fn page_exists(&self, label: &str) -> bool {
        self.contains_name(&label_to_page_name(label))
    }
}

/// URL pieces wrapped around a page name when building a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub base_url: String,
    pub end_suffix: String,
}

impl LinkConfig {
    pub fn new(base_url: impl Into<String>, end_suffix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            end_suffix: end_suffix.into(),
        }
    }

    /// URL of the page with the given label, with the page name percent-encoded
    pub fn page_url(&self, label: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            encode_page_name(&label_to_page_name(label)),
            self.end_suffix
        )
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::new("/", ".html")
    }
}

/// A parsed `[[target|display]]` occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    pub target: String,
    pub display: Option<String>,
}

impl WikiLink {
    /// Parse the text between `[[` and `]]`.
    ///
    /// Returns `None` for an empty target or one containing brackets or a
    /// line break; the caller leaves such occurrences as literal text.
    pub fn parse(inner: &str) -> Option<Self> {
        let (target, display) = match inner.split_once('|') {
            Some((target, display)) => (target.trim(), Some(display.trim())),
            None => (inner.trim(), None),
        };

        if target.is_empty() || target.contains(['[', ']', '\n', '\r']) {
            return None;
        }

        Some(Self {
            target: target.to_string(),
            display: display.filter(|d| !d.is_empty()).map(str::to_string),
        })
    }

    /// Text shown for the link
    pub fn text(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.target)
    }
}

/// A wikilink after URL and existence resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub url: String,
    pub css_class: String,
    pub text: String,
}

impl ResolvedLink {
    pub fn is_missing(&self) -> bool {
        self.css_class == NOT_FOUND_CLASS
    }

    /// Anchor markup for this link
    pub fn to_html(&self) -> String {
        if self.css_class.is_empty() {
            format!(
                "<a href=\"{}\">{}</a>",
                html_escape(&self.url),
                html_escape(&self.text)
            )
        } else {
            format!(
                "<a class=\"{}\" href=\"{}\">{}</a>",
                html_escape(&self.css_class),
                html_escape(&self.url),
                html_escape(&self.text)
            )
        }
    }
}

/// Transformer for wikilink syntax
pub struct WikilinkTransformer<'a> {
    config: LinkConfig,
    pages: &'a dyn PageExists,
}

impl<'a> WikilinkTransformer<'a> {
    pub fn new(config: LinkConfig, pages: &'a dyn PageExists) -> Self {
        Self { config, pages }
    }

    /// Resolve a parsed link against the configured URL scheme and page set
    pub fn resolve(&self, link: &WikiLink) -> ResolvedLink {
        let label = canonical_label(&link.target);
        let css_class = if self.pages.page_exists(&label) {
            String::new()
        } else {
            NOT_FOUND_CLASS.to_string()
        };

        ResolvedLink {
            url: self.config.page_url(&label),
            css_class,
            text: link.text().to_string(),
        }
    }

    fn process_wikilinks<'e>(&self, text: &str, report: &mut LinkReport) -> Vec<Event<'e>> {
        let mut events = Vec::new();
        let mut literal = String::new();
        let mut remaining = text;

        while let Some(start) = remaining.find("[[") {
            literal.push_str(&remaining[..start]);
            let after_open = &remaining[start + 2..];

            let Some(end) = after_open.find("]]") else {
                // No closing ]], the rest is literal text
                literal.push_str(&remaining[start..]);
                remaining = "";
                break;
            };

            match WikiLink::parse(&after_open[..end]) {
                Some(link) => {
                    flush_text(&mut events, &mut literal);

                    let resolved = self.resolve(&link);
                    let page_name = label_to_page_name(&canonical_label(&link.target));
                    if resolved.is_missing() {
                        tracing::debug!("Link to missing page: {}", link.target);
                        report.missing.push(page_name.clone());
                    }
                    report.outgoing.push(page_name);

                    events.push(Event::InlineHtml(CowStr::Boxed(
                        resolved.to_html().into_boxed_str(),
                    )));
                    remaining = &after_open[end + 2..];
                }
                None => {
                    // Malformed, keep the opening brackets and rescan after them
                    literal.push_str("[[");
                    remaining = after_open;
                }
            }
        }

        literal.push_str(remaining);
        flush_text(&mut events, &mut literal);
        events
    }
}

fn flush_text<'e>(events: &mut Vec<Event<'e>>, literal: &mut String) {
    if !literal.is_empty() {
        let text = std::mem::take(literal);
        events.push(Event::Text(CowStr::Boxed(text.into_boxed_str())));
    }
}

impl EventTransformer for WikilinkTransformer<'_> {
    /// Convert [[wikilinks]] inside text events into anchors
    fn transform<'e>(&self, events: Vec<Event<'e>>, report: &mut LinkReport) -> Vec<Event<'e>> {
        let mut result = Vec::with_capacity(events.len());
        let mut in_code_block = false;
        let mut events = events.into_iter().peekable();

        while let Some(event) = events.next() {
            match event {
                Event::Start(Tag::CodeBlock(_)) => {
                    in_code_block = true;
                    result.push(event);
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    result.push(event);
                }
                Event::Text(text) if !in_code_block => {
                    // pulldown-cmark splits bracketed text into several events
                    let mut merged_text = text.to_string();
                    while let Some(Event::Text(next)) = events.peek() {
                        merged_text.push_str(next.as_ref());
                        events.next();
                    }

                    if merged_text.contains("[[") && merged_text.contains("]]") {
                        result.extend(self.process_wikilinks(&merged_text, report));
                    } else {
                        result.push(Event::Text(CowStr::Boxed(merged_text.into_boxed_str())));
                    }
                }
                other => result.push(other),
            }
        }

        result
    }
}
