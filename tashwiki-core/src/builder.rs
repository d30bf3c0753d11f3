//! Site pass driver - discovers pages, resolves links, collects categories.
//!
//! The pass has two phases. [`SiteBuilder::build`] performs the collection
//! phase and hands back a [`SiteIndex`]; the caller renders from that index
//! afterwards. Category membership is only complete once `build` returns.

use crate::{
    categories::CategoryRegistry,
    config::{Config, END_SUFFIX},
    markdown::{EventTransformer, KnownPages, LinkConfig, MarkdownProcessor, WikilinkTransformer},
    meta::{parse_metadata, validate_meta, MetaError, TemplateCatalog},
    models::{Page, SiteIndex},
    naming::{canonical_page_name, is_safe_page_name, page_name_to_label},
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Template used when a page does not pick one
pub const DEFAULT_TEMPLATE: &str = "page.html";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to scan source directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Source directory not found: {0:?}")]
    MissingSource(PathBuf),

    #[error("{path:?}: {source}")]
    Meta {
        path: PathBuf,
        #[source]
        source: MetaError,
    },

    #[error("{0:?}: file name does not give a usable page name")]
    InvalidPageName(PathBuf),

    #[error("{path:?}: page name '{name}' is reserved for the category listing")]
    ReservedPage { name: String, path: PathBuf },

    #[error("Duplicate page name '{name}': {first:?} and {second:?}")]
    DuplicatePage {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Main site builder
pub struct SiteBuilder<'c> {
    config: Config,
    catalog: &'c dyn TemplateCatalog,
}

impl<'c> SiteBuilder<'c> {
    pub fn new(config: Config, catalog: &'c dyn TemplateCatalog) -> Self {
        Self { config, catalog }
    }

    /// Run the collection phase over every page in the source directory
    pub fn build(&self) -> Result<SiteIndex, BuildError> {
        let source_dir = self.config.source_dir();
        if !source_dir.is_dir() {
            return Err(BuildError::MissingSource(source_dir));
        }

        let markdown_files = self.discover_markdown_files(&source_dir)?;
        tracing::info!("Found {} markdown files", markdown_files.len());

        // First pass - page names only, so links can be checked for existence
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        let mut known = KnownPages::new();
        let mut sources = Vec::with_capacity(markdown_files.len());
        let reserved = self.config.categories_page_name();
        for path in markdown_files {
            let name = page_name_for(&path);
            if !is_safe_page_name(&name) {
                return Err(BuildError::InvalidPageName(path));
            }
            if name == reserved {
                return Err(BuildError::ReservedPage { name, path });
            }
            if let Some(first) = seen.get(&name) {
                return Err(BuildError::DuplicatePage {
                    name,
                    first: first.clone(),
                    second: path,
                });
            }
            seen.insert(name.clone(), path.clone());
            known.insert(name.clone());
            sources.push((path, name));
        }

        tracing::debug!("{} page names known", known.len());

        let link_config = LinkConfig::new(self.config.normalized_base_url(), END_SUFFIX);
        let wikilinks: Box<dyn EventTransformer + '_> =
            Box::new(WikilinkTransformer::new(link_config, &known));
        let processor = MarkdownProcessor::with_extensions(vec![wikilinks]);

        // Second pass - convert pages and accumulate category membership
        let mut categories = CategoryRegistry::new(&self.config.site.category_page, END_SUFFIX);
        let mut pages = Vec::with_capacity(sources.len());
        for (path, name) in sources {
            let page = self.collect_page(&processor, &path, name, &mut categories)?;
            pages.push(page);
        }

        tracing::info!(
            "Collected {} pages in {} categories",
            pages.len(),
            categories.len()
        );

        Ok(SiteIndex { pages, categories })
    }

    /// Discover all markdown files below the source directory, sorted by name
    fn discover_markdown_files(&self, source_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(source_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().is_some_and(|ext| ext == "md") {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn collect_page(
        &self,
        processor: &MarkdownProcessor<'_>,
        path: &Path,
        name: String,
        categories: &mut CategoryRegistry,
    ) -> Result<Page, BuildError> {
        let content = fs::read_to_string(path)?;
        let (raw_meta, body) = parse_metadata(&content);
        let meta = validate_meta(&raw_meta, self.catalog).map_err(|source| BuildError::Meta {
            path: path.to_path_buf(),
            source,
        })?;

        let converted = processor.convert(body);
        let label = page_name_to_label(&name);

        // A page joins each category once, however often it names it
        let mut page_categories: Vec<String> = Vec::with_capacity(meta.categories.len());
        for category in meta.categories {
            if page_categories.contains(&category) {
                tracing::warn!("{:?} declares category '{}' twice", path, category);
                continue;
            }
            categories.get_or_create(&category).add_page(label.clone());
            page_categories.push(category);
        }

        if !converted.links.missing.is_empty() {
            tracing::debug!(
                "{} links to missing pages: {}",
                name,
                converted.links.missing.join(", ")
            );
        }

        tracing::debug!("Collected: {}", name);

        Ok(Page {
            title: meta.title.unwrap_or_else(|| label.clone()),
            label,
            name,
            author: meta.author,
            template: meta
                .template
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            categories: page_categories,
            content_html: converted.html,
            outgoing_links: converted.links.outgoing,
            missing_links: converted.links.missing,
        })
    }
}

/// Canonical page name for a source file, from its stem
fn page_name_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    canonical_page_name(&stem)
}
