//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../tashwiki.yml.example");

/// Initialize a new tashwiki project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_content(root)?;

    println!("✓ tashwiki initialized in {:?}", root);
    println!("  - Edit tashwiki.yml to set the site name and author");
    println!("  - Write pages in content/ and link them with [[Page Name]]");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("tashwiki.yml");
    if config_path.exists() {
        println!("tashwiki.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_content(root: &Path) -> Result<()> {
    let content = root.join("content");
    fs::create_dir_all(&content).with_context(|| format!("Failed to create {:?}", content))?;

    let main_page = content.join("Main_Page.md");
    if !main_page.exists() {
        fs::write(&main_page, MAIN_PAGE)
            .with_context(|| format!("Failed to write {:?}", main_page))?;
        println!("Created {:?}", main_page);
    }

    Ok(())
}

const MAIN_PAGE: &str = r#"title: Main Page
categories: Help

# Welcome

This is your new wiki. Build it with:

```bash
tashwiki build
tashwiki serve
```

Link to other pages with [[Page Name]] or [[Page Name|custom text]].
Links to pages that do not exist yet, like [[Getting Started]], are marked so
you can find them and write them later.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tashwiki_core::Config;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_config_and_main_page() {
        let dir = tempdir().unwrap();
        init_project(Some(dir.path())).unwrap();

        let config = Config::from_file(dir.path().join("tashwiki.yml")).unwrap();
        assert_eq!(config.site.main_page, "Main Page");
        assert!(dir.path().join("content/Main_Page.md").exists());
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("tashwiki.yml"), "site:\n  name: Mine\n  author: Me\n").unwrap();

        init_project(Some(dir.path())).unwrap();

        let config = fs::read_to_string(dir.path().join("tashwiki.yml")).unwrap();
        assert!(config.contains("Mine"));
    }
}
