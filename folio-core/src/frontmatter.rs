//! Frontmatter parsing from markdown files.

use folio_types::Metadata;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Frontmatter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n(.*))?$")
            .expect("frontmatter regex is valid")
    })
}

/// Parse frontmatter from markdown content
///
/// Returns a tuple of (fields, markdown_body).
/// If no frontmatter is present, returns empty fields with the full content as body.
///
/// # Example
///
/// ```
/// use folio_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\ndate: 2025-01-01\n---\n# Hello World\n";
///
/// let (fields, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(fields["title"], "My Post");
/// assert_eq!(fields["date"], "2025-01-01");
/// assert!(body.trim().starts_with("# Hello World"));
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(Metadata, String), FrontmatterError> {
    let Some(captures) = frontmatter_regex().captures(content) else {
        return Ok((Metadata::new(), content.to_string()));
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    if yaml.trim().is_empty() {
        return Ok((Metadata::new(), body.to_string()));
    }

    let fields = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Object(map) => map,
        Value::Null => Metadata::new(),
        other => return Err(FrontmatterError::NotAMapping(kind_name(&other))),
    };

    Ok((fields, body.to_string()))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = r#"---
title: Test Post
description: A test post
date: 2025-01-01
layout: post.njk
---

# Hello World

This is the content."#;

        let (fields, body) = parse_frontmatter(content).unwrap();
        assert_eq!(fields["title"], "Test Post");
        assert_eq!(fields["description"], "A test post");
        assert_eq!(fields["date"], "2025-01-01");
        assert_eq!(fields["layout"], "post.njk");
        assert!(body.contains("# Hello World"));
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_parse_nested_frontmatter() {
        let content = r#"---
title: Nested
post:
  date: 2024-05-01
  featured: true
tags:
  - rust
  - web
---
Body."#;

        let (fields, _) = parse_frontmatter(content).unwrap();
        assert_eq!(fields["post"], json!({ "date": "2024-05-01", "featured": true }));
        assert_eq!(fields["tags"], json!(["rust", "web"]));
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "# Just Content\n\nNo frontmatter here.";
        let (fields, body) = parse_frontmatter(content).unwrap();
        assert!(fields.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parse_empty_frontmatter() {
        let (fields, body) = parse_frontmatter("---\n---\nBody").unwrap();
        assert!(fields.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_frontmatter_with_draft() {
        let content = "---\ntitle: Draft Post\ndraft: true\n---\n\nContent.";
        let (fields, _) = parse_frontmatter(content).unwrap();
        assert_eq!(fields["draft"], true);
    }

    #[test]
    fn test_invalid_yaml() {
        let content = r#"---
title: Test
invalid yaml: [unclosed
---

Content."#;

        assert!(parse_frontmatter(content).is_err());
    }

    #[test]
    fn test_scalar_frontmatter_rejected() {
        let result = parse_frontmatter("---\njust a string\n---\nBody");
        match result {
            Err(FrontmatterError::NotAMapping(kind)) => assert_eq!(kind, "a string"),
            _ => panic!("Expected NotAMapping error"),
        }
    }
}
