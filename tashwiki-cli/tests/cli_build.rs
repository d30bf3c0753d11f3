use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const CONFIG: &str = r#"
site:
  name: "Test Wiki"
  author: "Tester"
paths:
  source: "content"
  output: "site"
base_url: "/"
"#;

fn write_project(root: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = root.join("content");
    fs::create_dir_all(&content)?;
    fs::write(root.join("tashwiki.yml"), CONFIG)?;
    fs::write(
        content.join("Main_Page.md"),
        "title: Main Page\ncategories: Help\n\nSee [[Rust notes]] and [[Nowhere|the void]].\n",
    )?;
    fs::write(
        content.join("Rust_notes.md"),
        "categories: Programming, help\n\nBack to [[Main Page]].\n",
    )?;
    Ok(())
}

#[test]
fn build_writes_pages_and_categories() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_project(dir.path())?;

    Command::cargo_bin("tashwiki")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success();

    let site = dir.path().join("site");
    let main_page = fs::read_to_string(site.join("Main_Page.html"))?;
    assert!(main_page.contains("<a href=\"/Rust_notes.html\">Rust notes</a>"));
    assert!(main_page.contains("<a class=\"notfound\" href=\"/Nowhere.html\">the void</a>"));

    assert!(site.join("Rust_notes.html").exists());
    assert!(site.join("static/style.css").exists());

    let listing = fs::read_to_string(site.join("Categories.html"))?;
    let help = listing.find("Category/Help.html").ok_or("Help missing")?;
    let programming = listing
        .find("Category/Programming.html")
        .ok_or("Programming missing")?;
    assert!(help < programming, "categories keep first-seen order");

    let help_page = fs::read_to_string(site.join("Category/Help.html"))?;
    let main = help_page.find("/Main_Page.html\">Main Page").ok_or("Main Page missing")?;
    let rust = help_page.find("/Rust_notes.html\">Rust notes").ok_or("Rust notes missing")?;
    assert!(main < rust, "members keep sorted file order");

    Ok(())
}

#[test]
fn build_rejects_unknown_meta_field() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_project(dir.path())?;
    fs::write(
        dir.path().join("content/Bad.md"),
        "title: Bad\ndate: 2024-01-01\n\nBody\n",
    )?;

    Command::cargo_bin("tashwiki")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown meta field 'date'."));

    Ok(())
}

#[test]
fn init_then_build() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    Command::cargo_bin("tashwiki")?
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("tashwiki initialized"));

    Command::cargo_bin("tashwiki")?
        .current_dir(dir.path())
        .args(["--config", "tashwiki.yml", "build"])
        .assert()
        .success();

    assert!(dir.path().join("output/Main_Page.html").exists());
    assert!(dir.path().join("output/Category/Help.html").exists());
    Ok(())
}
