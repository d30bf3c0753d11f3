//! Conversion between page names and human-readable labels.
//!
//! A page name is what ends up on disk and in URLs (`Main_Page`), a label is
//! what readers see (`Main Page`). Both directions are pure and total. Words in
//! a page name are separated by [`WORD_SEPARATOR`] and the first character is
//! always upper case, so `label_to_page_name(page_name_to_label(n)) == n` holds
//! for every name produced by [`canonical_page_name`].
//!
//! Page names may contain characters with a meaning in URLs (`C#_notes`), so
//! links go through [`encode_page_name`] while file names use the name as is.

/// Character that stands in for a space inside page names.
pub const WORD_SEPARATOR: char = '_';

/// Convert a page name into its display label.
///
/// # Examples
///
/// ```
/// use tashwiki_core::naming::page_name_to_label;
///
/// assert_eq!(page_name_to_label("Main_Page"), "Main Page");
/// assert_eq!(page_name_to_label("rust_lang"), "Rust lang");
/// ```
pub fn page_name_to_label(name: &str) -> String {
    upper_first(&name.replace(WORD_SEPARATOR, " "))
}

/// Convert a label into the page name used for file paths and link targets.
///
/// # Examples
///
/// ```
/// use tashwiki_core::naming::label_to_page_name;
///
/// assert_eq!(label_to_page_name("Main Page"), "Main_Page");
/// assert_eq!(label_to_page_name("foo bar"), "Foo_bar");
/// ```
pub fn label_to_page_name(label: &str) -> String {
    upper_first(&label.replace(' ', &WORD_SEPARATOR.to_string()))
}

/// Canonical page name for a source file stem.
///
/// Idempotent; every page name the site pass hands out goes through here, so
/// a file and a link naming it by its label always agree.
///
/// ```
/// use tashwiki_core::naming::canonical_page_name;
///
/// assert_eq!(canonical_page_name("A__B"), "A_B");
/// ```
pub fn canonical_page_name(stem: &str) -> String {
    label_to_page_name(&canonical_label(stem))
}

/// Normalize a label typed by a human (metadata values, link targets).
///
/// Rules:
/// - Separators become spaces
/// - Trim leading/trailing whitespace
/// - Collapse runs of whitespace into one space
/// - First character upper case
///
/// ```
/// use tashwiki_core::naming::canonical_label;
///
/// assert_eq!(canonical_label("  rust   programming "), "Rust programming");
/// assert_eq!(canonical_label("Rust__programming"), "Rust programming");
/// ```
pub fn canonical_label(raw: &str) -> String {
    let spaced = raw.replace(WORD_SEPARATOR, " ");
    upper_first(&spaced.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Percent-encode a page name for use inside a URL path segment.
///
/// ```
/// use tashwiki_core::naming::encode_page_name;
///
/// assert_eq!(encode_page_name("C#_notes"), "C%23_notes");
/// assert_eq!(encode_page_name("Main_Page"), "Main_Page");
/// ```
pub fn encode_page_name(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Whether a page name can be used as a file name inside the output directory
pub fn is_safe_page_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

fn upper_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
