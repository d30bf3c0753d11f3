//! # tashwiki-core
//!
//! Core library for the tashwiki static site generator.
//!
//! This crate turns a directory of markdown pages into an in-memory
//! [`SiteIndex`]: page names and labels via [`naming`], `[[wikilinks]]`
//! resolved by the [`markdown`] pipeline, and category membership accumulated
//! in a [`CategoryRegistry`]. Rendering the index is left to the caller.

pub mod builder;
pub mod categories;
pub mod config;
pub mod markdown;
pub mod meta;
pub mod models;
pub mod naming;

pub use builder::{BuildError, SiteBuilder, DEFAULT_TEMPLATE};
pub use categories::{Category, CategoryRegistry};
pub use config::{Config, END_SUFFIX};
pub use markdown::{
    EventTransformer, KnownPages, LinkConfig, MarkdownProcessor, PageExists, WikilinkTransformer,
};
pub use meta::{MetaError, PageMeta, TemplateCatalog};
pub use models::{Page, SiteIndex};
pub use naming::{canonical_label, encode_page_name, label_to_page_name, page_name_to_label};
