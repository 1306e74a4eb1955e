//! Navigation URLs for paginated index pages.

use serde::Serialize;

/// How page URLs are spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlScheme {
    /// `/blog/2/` (directory with an index file)
    Permalink,
    /// `/blog/2.html`
    Flat,
}

impl UrlScheme {
    pub fn from_permalinks(use_permalinks: bool) -> Self {
        if use_permalinks {
            UrlScheme::Permalink
        } else {
            UrlScheme::Flat
        }
    }
}

/// First/last/next/previous links for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageUrls {
    pub first: String,
    pub last: String,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Substitute `:directory` and `:num` in an output pattern.
///
/// Only the first occurrence of each placeholder is replaced.
pub fn resolve_pattern(pattern: &str, directory: &str, page: usize) -> String {
    pattern
        .replacen(":directory", directory, 1)
        .replacen(":num", &page.to_string(), 1)
}

/// Compute navigation URLs for `page` (1-based) out of `total_pages`
pub fn page_urls(
    directory: &str,
    pattern: &str,
    page: usize,
    total_pages: usize,
    scheme: UrlScheme,
) -> PageUrls {
    let page_url = |num: usize| {
        let resolved = resolve_pattern(pattern, directory, num);
        match scheme {
            UrlScheme::Permalink => clean_url(&format!("/{resolved}/index.html")),
            UrlScheme::Flat => format!("/{resolved}.html"),
        }
    };

    let first = match scheme {
        UrlScheme::Permalink => clean_url(&format!("/{directory}/index.html")),
        UrlScheme::Flat => format!("/{directory}.html"),
    };
    let last = page_url(total_pages);
    let next = (page < total_pages).then(|| page_url(page + 1));
    let previous = match page {
        0 | 1 => None,
        2 => Some(first.clone()),
        _ => Some(page_url(page - 1)),
    };

    PageUrls {
        first: collapse_slashes(&first),
        last: collapse_slashes(&last),
        next: next.map(|u| collapse_slashes(&u)),
        previous: previous.map(|u| collapse_slashes(&u)),
    }
}

/// Turn an output path into a clean URL.
///
/// `/index.html` becomes a trailing slash, other `.md`/`.html` suffixes are
/// dropped, a leading slash is enforced and a trailing slash is removed
/// unless the whole URL is `/`.
pub fn clean_url(path: &str) -> String {
    if let Some(dir) = path.strip_suffix("/index.html") {
        return collapse_slashes(&format!("/{dir}/"));
    }

    let stripped = path
        .strip_suffix(".md")
        .or_else(|| path.strip_suffix(".html"))
        .unwrap_or(path);

    let mut url = if stripped.starts_with('/') {
        stripped.to_string()
    } else {
        format!("/{stripped}")
    };

    if url.len() > 1 && url.ends_with('/') {
        url.pop();
    }

    collapse_slashes(&url)
}

/// Replace every run of slashes with a single slash
pub fn collapse_slashes(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut previous_slash = false;
    for c in url.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(c);
    }
    out
}
