//! Markdown processing pipeline with pluggable event extensions.
//!
//! Tables are enabled, and a table row splits on every unescaped `|` before any
//! extension runs. Inside a table cell the display form of a wikilink must be
//! written `[[Target\|Text]]`; an unescaped `[[Target|Text]]` becomes two cells
//! of literal text.

pub mod wikilinks;

#[cfg(test)]
mod test_integration;

use pulldown_cmark::{html, Event, Options, Parser};

pub use wikilinks::{
    KnownPages, LinkConfig, PageExists, ResolvedLink, WikiLink, WikilinkTransformer,
    NOT_FOUND_CLASS,
};

/// Page names referenced while converting one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Every link target, in document order
    pub outgoing: Vec<String>,
    /// Targets for which no page exists
    pub missing: Vec<String>,
}

/// An extension the [`MarkdownProcessor`] runs over the parsed event stream.
///
/// Extensions see events after pulldown-cmark has parsed standard syntax, so
/// regular `[text](url)` links are already `Link` events by the time an
/// extension looks at the text around them.
pub trait EventTransformer {
    fn transform<'e>(&self, events: Vec<Event<'e>>, report: &mut LinkReport) -> Vec<Event<'e>>;
}

/// Result of converting one document
#[derive(Debug, Clone, Default)]
pub struct Converted {
    pub html: String,
    pub links: LinkReport,
}

/// Markdown processor with custom extensions
pub struct MarkdownProcessor<'x> {
    options: Options,
    extensions: Vec<Box<dyn EventTransformer + 'x>>,
}

impl<'x> MarkdownProcessor<'x> {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            options,
            extensions: Vec::new(),
        }
    }

    /// Processor running the given extensions in order
    pub fn with_extensions(extensions: Vec<Box<dyn EventTransformer + 'x>>) -> Self {
        Self {
            extensions,
            ..Self::new()
        }
    }

    /// Convert markdown to HTML with all installed extensions
    pub fn convert(&self, markdown: &str) -> Converted {
        let parser = Parser::new_ext(markdown, self.options);
        let mut events: Vec<Event> = parser.collect();
        let mut links = LinkReport::default();

        for extension in &self.extensions {
            events = extension.transform(events, &mut links);
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Converted {
            html: html_output,
            links,
        }
    }
}

impl Default for MarkdownProcessor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let processor = MarkdownProcessor::new();
        let converted = processor.convert("# Hello World\n\nThis is a **test**.");
        assert!(converted.html.contains("<h1>Hello World</h1>"));
        assert!(converted.html.contains("<strong>test</strong>"));
        assert!(converted.links.outgoing.is_empty());
    }

    #[test]
    fn test_tables() {
        let processor = MarkdownProcessor::new();
        let md = r#"
| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |
"#;
        let html = processor.convert(md).html;
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>Header 1</th>"));
    }

    #[test]
    fn test_without_extensions_brackets_stay_literal() {
        let processor = MarkdownProcessor::default();
        let html = processor.convert("See [[Somewhere]].").html;
        assert!(html.contains("[[Somewhere]]"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
