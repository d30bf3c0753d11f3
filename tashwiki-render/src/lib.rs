//! # tashwiki-render
//!
//! Template rendering library for tashwiki.
//!
//! This crate handles HTML template rendering using Askama and tells the core
//! which page layouts exist.

pub mod templates;

pub use templates::{
    render_categories, render_category, render_page, CategoryLink, PageLink, RenderError,
    SiteContext, Templates, PAGE_TEMPLATES,
};
