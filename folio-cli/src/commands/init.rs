//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../folio.yml.example");

/// Initialize a new folio project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_sources(root)?;

    println!("✓ folio initialized in {:?}", root);
    println!("  - Edit folio.yml to change pagination settings");
    println!("  - Write posts in src/blog/");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("folio.yml");
    if config_path.exists() {
        println!("folio.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_sources(root: &Path) -> Result<()> {
    let src = root.join("src");
    let blog = src.join("blog");
    let data = root.join("lib").join("data");

    for dir in [&src, &blog, &data] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    write_if_missing(&src.join("blog.md"), BLOG_INDEX)?;
    write_if_missing(&blog.join("first-post.md"), &sample_post(1))?;
    write_if_missing(&blog.join("second-post.md"), &sample_post(2))?;
    write_if_missing(&blog.join("third-post.md"), &sample_post(3))?;
    write_if_missing(&data.join("site.json"), SITE_DATA)?;

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Created {:?}", path);
    Ok(())
}

const BLOG_INDEX: &str = r#"---
title: Blog
layout: blog.njk
---

Latest posts.
"#;

const SITE_DATA: &str = r#"{
  "title": "My Site",
  "siteURL": "https://example.com"
}
"#;

fn sample_post(n: u32) -> String {
    format!(
        r#"---
title: Post {n}
date: 2025-01-0{n}
---

# Post {n}

Run `folio plan` to see which page this post lands on.
"#
    )
}
