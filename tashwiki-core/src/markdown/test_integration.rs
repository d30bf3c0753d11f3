//! Integration tests for markdown processing

use super::*;

fn processor_for<'a>(pages: &'a dyn PageExists) -> MarkdownProcessor<'a> {
    let wikilinks: Box<dyn EventTransformer + 'a> =
        Box::new(WikilinkTransformer::new(LinkConfig::default(), pages));
    MarkdownProcessor::with_extensions(vec![wikilinks])
}

#[test]
fn test_full_pipeline_with_wikilinks() {
    let mut pages = KnownPages::new();
    pages.insert("Rust_Safety");

    let processor = processor_for(&pages);
    let converted = processor.convert("Check out [[Rust Safety]] for more info.");

    assert_eq!(
        converted.html,
        "<p>Check out <a href=\"/Rust_Safety.html\">Rust Safety</a> for more info.</p>\n"
    );
    assert_eq!(converted.links.outgoing, vec!["Rust_Safety"]);
    assert!(converted.links.missing.is_empty());
}

#[test]
fn test_missing_page_in_paragraph() {
    let pages = KnownPages::new();
    let processor = processor_for(&pages);
    let converted = processor.convert("This is a paragraph with [[Page Name|a page]] in it.");

    assert!(!converted.html.contains("[["), "Wikilinks should be converted");
    assert!(converted
        .html
        .contains("<a class=\"notfound\" href=\"/Page_Name.html\">a page</a>"));
    assert_eq!(converted.links.missing, vec!["Page_Name"]);
}

#[test]
fn test_standard_links_are_not_shadowed() {
    let pages = |_: &str| true;
    let processor = processor_for(&pages);
    let converted =
        processor.convert("A [normal link](https://example.com) next to [[Wiki Page]].");

    assert!(converted
        .html
        .contains("<a href=\"https://example.com\">normal link</a>"));
    assert!(converted
        .html
        .contains("<a href=\"/Wiki_Page.html\">Wiki Page</a>"));
    assert_eq!(converted.links.outgoing, vec!["Wiki_Page"]);
}

#[test]
fn test_links_inside_emphasis() {
    let pages = |_: &str| true;
    let processor = processor_for(&pages);
    let html = processor.convert("*see [[Other]]*").html;

    assert!(html.contains("<em>see <a href=\"/Other.html\">Other</a></em>"));
}

#[test]
fn test_code_is_left_alone() {
    let pages = |_: &str| true;
    let processor = processor_for(&pages);
    let converted = processor.convert("Inline `[[Code]]`\n\n```\n[[Fenced]]\n```\n");

    assert!(converted.html.contains("<code>[[Code]]</code>"));
    assert!(converted.html.contains("[[Fenced]]"));
    assert!(converted.links.outgoing.is_empty());
}

#[test]
fn test_malformed_link_does_not_abort_page() {
    let pages = |_: &str| true;
    let processor = processor_for(&pages);
    let converted = processor.convert("Broken [[ here.\n\nStill [[Fine]] later.");

    assert!(converted.html.contains("Broken [[ here."));
    assert!(converted.html.contains("<a href=\"/Fine.html\">Fine</a>"));
}

#[test]
fn test_links_in_table_cells() {
    let pages = |_: &str| true;
    let processor = processor_for(&pages);
    let md = "| Page | Note |\n|------|------|\n| [[Other]] | [[Other\\|shown]] |\n";
    let converted = processor.convert(md);

    assert!(converted
        .html
        .contains("<td><a href=\"/Other.html\">Other</a></td>"));
    assert!(converted
        .html
        .contains("<td><a href=\"/Other.html\">shown</a></td>"));
    assert_eq!(converted.links.outgoing, vec!["Other", "Other"]);
}

#[test]
fn test_unescaped_pipe_in_table_splits_the_link() {
    let pages = |_: &str| true;
    let processor = processor_for(&pages);
    let md = "| A | B |\n|---|---|\n| [[Other|shown]] |\n";
    let converted = processor.convert(md);

    assert!(converted.html.contains("<td>[[Other</td>"));
    assert!(converted.html.contains("<td>shown]]</td>"));
    assert!(converted.links.outgoing.is_empty());
}
