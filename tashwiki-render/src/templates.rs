//! Askama template definitions.

use askama::Template;
use tashwiki_core::{
    encode_page_name, label_to_page_name, Category, CategoryRegistry, Config, Page,
    TemplateCatalog, END_SUFFIX,
};
use thiserror::Error;

/// Layouts a page may select with its `template` field
pub const PAGE_TEMPLATES: &[&str] = &["page.html", "plain.html"];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Askama(#[from] askama::Error),

    #[error("Template '{0}' not found.")]
    UnknownTemplate(String),
}

/// The set of templates compiled into this crate
#[derive(Debug, Clone, Copy, Default)]
pub struct Templates;

impl TemplateCatalog for Templates {
    fn has_template(&self, name: &str) -> bool {
        PAGE_TEMPLATES.iter().any(|t| *t == name)
    }
}

/// Site-wide values every template can use
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub site_name: String,
    pub author: String,
    pub language: String,
    pub base_url: String,

    // Navigation
    pub main_page: String,
    pub main_page_url: String,
    pub categories_page: String,
    pub categories_url: String,

    /// Label prefix of per-category page titles
    pub category_page: String,
}

impl SiteContext {
    pub fn from_config(config: &Config) -> Self {
        let base_url = config.normalized_base_url();
        Self {
            site_name: config.site.name.clone(),
            author: config.site.author.clone(),
            language: config.site.language.clone(),
            main_page: config.site.main_page.clone(),
            main_page_url: format!("{}{}", base_url, config.main_page_href()),
            categories_page: config.site.categories_page.clone(),
            categories_url: format!("{}{}", base_url, config.categories_href()),
            category_page: config.site.category_page.clone(),
            base_url,
        }
    }

    fn page_url(&self, label: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            encode_page_name(&label_to_page_name(label)),
            END_SUFFIX
        )
    }
}

/// A link to a category
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub label: String,
    pub url: String,
    pub count: usize,
}

/// A link to a page
#[derive(Debug, Clone)]
pub struct PageLink {
    pub title: String,
    pub url: String,
}

/// Default page layout
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate<'a> {
    pub site: &'a SiteContext,
    pub title: String,
    pub author: String,
    pub content: String,
    pub categories: Vec<CategoryLink>,
}

/// Page layout without navigation
#[derive(Template)]
#[template(path = "plain.html")]
pub struct PlainTemplate<'a> {
    pub site: &'a SiteContext,
    pub title: String,
    pub author: String,
    pub content: String,
    pub categories: Vec<CategoryLink>,
}

/// Listing of every category
#[derive(Template)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate<'a> {
    pub site: &'a SiteContext,
    pub title: String,
    pub author: String,
    pub categories: Vec<CategoryLink>,
}

/// One category and its member pages
#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate<'a> {
    pub site: &'a SiteContext,
    pub title: String,
    pub author: String,
    pub label: String,
    pub pages: Vec<PageLink>,
}

fn category_link(site: &SiteContext, category: &Category) -> CategoryLink {
    CategoryLink {
        label: category.label.clone(),
        url: format!("{}{}", site.base_url, category.url),
        count: category.pages.len(),
    }
}

/// Render a page with the layout it selected
pub fn render_page(
    site: &SiteContext,
    page: &Page,
    categories: &CategoryRegistry,
) -> Result<String, RenderError> {
    let category_links = page
        .categories
        .iter()
        .filter_map(|label| categories.get(label))
        .map(|category| category_link(site, category))
        .collect();
    let author = page.author.clone().unwrap_or_else(|| site.author.clone());

    let html = match page.template.as_str() {
        "page.html" => PageTemplate {
            site,
            title: page.title.clone(),
            author,
            content: page.content_html.clone(),
            categories: category_links,
        }
        .render()?,
        "plain.html" => PlainTemplate {
            site,
            title: page.title.clone(),
            author,
            content: page.content_html.clone(),
            categories: category_links,
        }
        .render()?,
        other => return Err(RenderError::UnknownTemplate(other.to_string())),
    };

    Ok(html)
}

/// Render the listing of all categories; call once the site pass is complete
pub fn render_categories(
    site: &SiteContext,
    categories: &CategoryRegistry,
) -> Result<String, RenderError> {
    let template = CategoriesTemplate {
        site,
        title: site.categories_page.clone(),
        author: site.author.clone(),
        categories: categories
            .iter()
            .map(|category| category_link(site, category))
            .collect(),
    };
    Ok(template.render()?)
}

/// Render the page of a single category
pub fn render_category(site: &SiteContext, category: &Category) -> Result<String, RenderError> {
    let template = CategoryTemplate {
        site,
        title: format!("{}: {}", site.category_page, category.label),
        author: site.author.clone(),
        label: category.label.clone(),
        pages: category
            .pages
            .iter()
            .map(|title| PageLink {
                title: title.clone(),
                url: site.page_url(title),
            })
            .collect(),
    };
    Ok(template.render()?)
}
