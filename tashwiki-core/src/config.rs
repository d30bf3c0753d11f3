//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::naming::{canonical_page_name, encode_page_name};

/// Extension of every generated page
pub const END_SUFFIX: &str = ".html";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the tashwiki.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    String::from("/")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub author: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Label of the landing page
    #[serde(default = "default_main_page")]
    pub main_page: String,

    /// Label of the page listing every category
    #[serde(default = "default_categories_page")]
    pub categories_page: String,

    /// Label prefix of per-category pages ("Category: Rust")
    #[serde(default = "default_category_page")]
    pub category_page: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_main_page() -> String {
    "Main Page".to_string()
}

fn default_categories_page() -> String {
    "Categories".to_string()
}

fn default_category_page() -> String {
    "Category".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_source")]
    pub source: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_source() -> PathBuf {
    PathBuf::from("content")
}

fn default_output() -> PathBuf {
    PathBuf::from("output")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse configuration from YAML text; paths stay relative to the working directory
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Get the source directory, resolved relative to config file
    pub fn source_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.source)
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_deref().and_then(Path::parent) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Normalized base URL with leading and trailing slash ("/foo/" or "/")
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }

    /// Page name taken by the category listing; no source page may use it
    pub fn categories_page_name(&self) -> String {
        canonical_page_name(&self.site.categories_page)
    }

    /// File name of the category listing page
    pub fn categories_file(&self) -> String {
        format!("{}{}", self.categories_page_name(), END_SUFFIX)
    }

    /// Link to the category listing, relative to the base URL
    pub fn categories_href(&self) -> String {
        format!("{}{}", encode_page_name(&self.categories_page_name()), END_SUFFIX)
    }

    /// Link to the main page, relative to the base URL
    pub fn main_page_href(&self) -> String {
        format!(
            "{}{}",
            encode_page_name(&canonical_page_name(&self.site.main_page)),
            END_SUFFIX
        )
    }
}

/// Ensure base URLs have a leading and trailing slash
pub fn normalize_base_url(raw: &str) -> String {
    let mut s = raw.trim().to_string();
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    if !s.ends_with('/') {
        s.push('/');
    }

    // Collapse duplicate slashes
    while s.contains("//") {
        s = s.replace("//", "/");
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
site:
  name: "Test Wiki"
  author: "Author"
"#;

    #[test]
    fn test_default_values() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.base_url, "/");
        assert_eq!(config.site.language, "en");
        assert_eq!(config.site.main_page, "Main Page");
        assert_eq!(config.site.categories_page, "Categories");
        assert_eq!(config.site.category_page, "Category");
        assert_eq!(config.source_dir(), PathBuf::from("content"));
        assert_eq!(config.output_dir(), PathBuf::from("output"));
        assert_eq!(config.categories_file(), "Categories.html");
        assert_eq!(config.categories_page_name(), "Categories");
        assert_eq!(config.main_page_href(), "Main_Page.html");
    }

    #[test]
    fn test_paths_resolve_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tashwiki.yml");
        std::fs::write(
            &path,
            format!("{MINIMAL}paths:\n  source: pages\n  output: /tmp/site\n"),
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.source_dir(), dir.path().join("pages"));
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/site"));
    }

    #[test]
    fn test_missing_site_section_fails() {
        let err = Config::from_yaml("base_url: /wiki/\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(""), "/");
        assert_eq!(normalize_base_url("/"), "/");
        assert_eq!(normalize_base_url("wiki"), "/wiki/");
        assert_eq!(normalize_base_url("/wiki//docs/"), "/wiki/docs/");
        assert_eq!(normalize_base_url(" /wiki "), "/wiki/");
    }
}
