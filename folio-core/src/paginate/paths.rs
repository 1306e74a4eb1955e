//! Per-item output paths.

use super::urls::{clean_url, collapse_slashes};

/// Split a file name into (stem, extension).
///
/// The extension is the final `.xxx` suffix including the dot, or an empty
/// string when the name has none.
pub fn split_file_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Compute `directory/<stem>/index.<ext>` for an item.
///
/// Only the last path segment is used, so nested sources are flattened
/// into the directory. Names without an extension get `.html`.
///
/// ```
/// use folio_core::paginate::paths::item_output_path;
///
/// assert_eq!(item_output_path("blog", "blog/hello.md"), "blog/hello/index.md");
/// assert_eq!(item_output_path("blog", "blog/notes"), "blog/notes/index.html");
/// ```
pub fn item_output_path(directory: &str, source_path: &str) -> String {
    let file_name = source_path.rsplit('/').next().unwrap_or(source_path);
    let (stem, extension) = split_file_name(file_name);
    let extension = if extension.is_empty() {
        ".html"
    } else {
        extension
    };
    format!("{directory}/{stem}/index{extension}")
}

/// URL reported for an item in page listings.
///
/// This is the clean URL of the output path with a trailing `/index`
/// turned into `/`. The stored output path keeps its `index` segments.
pub fn item_listing_url(output_path: &str) -> String {
    let url = clean_url(output_path);
    match url.strip_suffix("/index") {
        Some(dir) => format!("{dir}/"),
        None => url,
    }
}

/// Normalize a path used as a collection key: no duplicate or leading slashes
pub fn collection_key(path: &str) -> String {
    collapse_slashes(path).trim_start_matches('/').to_string()
}
