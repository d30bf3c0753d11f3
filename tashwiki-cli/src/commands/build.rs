//! Build command implementation.

use anyhow::{Context, Result};
use include_dir::{include_dir, Dir};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tashwiki_core::{Config, SiteBuilder, SiteIndex};
use tashwiki_render::{render_categories, render_category, render_page, SiteContext, Templates};

// Embed static assets (CSS) at compile time so they're available after cargo install
static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../static");

/// Build the static site (writes output) and discard the in-memory index
pub fn build_site(config_path: &Path) -> Result<()> {
    build_site_with_index(config_path).map(|_| ())
}

/// Build the static site and return the in-memory index alongside the loaded config
pub fn build_site_with_index(config_path: &Path) -> Result<(Config, SiteIndex)> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    build_site_with_config(config)
}

/// Build the site from an already loaded config, writing output and returning the index.
pub fn build_site_with_config(config: Config) -> Result<(Config, SiteIndex)> {
    tracing::info!("Building site: {}", config.site.name);

    // Collection phase: every page is converted and every category declared
    let builder = SiteBuilder::new(config.clone(), &Templates);
    let site_index = builder.build().context("Failed to build site")?;

    tracing::info!("Parsed {} pages", site_index.pages.len());

    let output_dir = config.output_dir();
    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    // Emission phase: the category registry is complete from here on
    let site = SiteContext::from_config(&config);

    for page in &site_index.pages {
        let html = render_page(&site, page, &site_index.categories)
            .with_context(|| format!("Failed to render page {}", page.name))?;
        write_output(&output_dir, &page.output_rel_path(), html)?;
        tracing::debug!("Rendered: {}", page.name);
    }

    let listing = render_categories(&site, &site_index.categories)
        .context("Failed to render categories page")?;
    write_output(&output_dir, &config.categories_file(), listing)?;

    for category in &site_index.categories {
        let html = render_category(&site, category)
            .with_context(|| format!("Failed to render category {}", category.label))?;
        write_output(&output_dir, &category.path, html)?;
        tracing::debug!("Rendered category: {}", category.label);
    }

    extract_embedded_static(&output_dir.join("static"))?;

    let missing = site_index.missing_link_count();
    if missing > 0 {
        tracing::info!("{} links point to pages that do not exist yet", missing);
    }

    tracing::info!(
        "✓ Built {} pages and {} categories",
        site_index.pages.len(),
        site_index.categories.len()
    );
    tracing::info!("✓ Output written to {:?}", output_dir);

    Ok((config, site_index))
}

fn write_output(output_dir: &Path, rel_path: &str, html: String) -> Result<()> {
    let output_path = output_path(output_dir, rel_path)?;
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(&output_path, html).with_context(|| format!("Failed to write {:?}", output_path))
}

/// Join a generated path onto the output directory, refusing anything that would leave it
fn output_path(output_dir: &Path, rel_path: &str) -> Result<PathBuf> {
    let rel = Path::new(rel_path);
    if rel_path.is_empty() || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        anyhow::bail!("Refusing to write {:?} outside the output directory", rel_path);
    }
    Ok(output_dir.join(rel))
}

fn extract_embedded_static(dest: &Path) -> Result<()> {
    // The include_dir crate stores full paths relative to the embedded root
    for entry in STATIC_ASSETS.entries() {
        extract_entry(entry, dest)?;
    }
    Ok(())
}

fn extract_entry(entry: &include_dir::DirEntry, dest: &Path) -> Result<()> {
    match entry {
        include_dir::DirEntry::Dir(dir) => {
            for sub_entry in dir.entries() {
                extract_entry(sub_entry, dest)?;
            }
        }
        include_dir::DirEntry::File(file) => {
            let target = dest.join(file.path());
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, file.contents())
                .with_context(|| format!("Failed to write embedded static file to {:?}", target))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_stays_inside_output_dir() {
        let out = Path::new("/srv/site");
        assert_eq!(
            output_path(out, "Category/C#.html").unwrap(),
            PathBuf::from("/srv/site/Category/C#.html")
        );
        assert!(output_path(out, "Category/../../escaped.html").is_err());
        assert!(output_path(out, "/etc/passwd").is_err());
        assert!(output_path(out, "").is_err());
    }

    #[test]
    fn test_categories_page_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("Categories.md"), "My own page.").unwrap();
        let config = Config::from_yaml(&format!(
            "site:\n  name: Test\n  author: Tester\npaths:\n  source: {}\n  output: {}\n",
            content.display(),
            dir.path().join("out").display()
        ))
        .unwrap();

        let err = build_site_with_config(config).unwrap_err();
        assert!(format!("{err:#}").contains("reserved for the category listing"));
        assert!(!dir.path().join("out/Categories.html").exists());
    }
}
