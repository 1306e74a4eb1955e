//! Selecting and ordering the items of a paginated directory.

use super::date::parse_date;
use folio_types::{compare_values, lookup, FileCollection, FileRecord};
use serde_json::Value;
use std::cmp::Ordering;

/// A file chosen for pagination, snapshotted from the collection
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedItem {
    /// Path of the file before pagination
    pub path: String,
    pub record: FileRecord,
    /// Value of the sort field, `None` when the field is absent
    pub sort_key: Option<Value>,
}

impl SelectedItem {
    pub fn new(path: impl Into<String>, record: FileRecord, sort_by: &str) -> Self {
        let path = path.into();
        let sort_key = lookup(&record.fields, sort_by).cloned().or_else(|| {
            // Items answer to their own path when they carry no `path` field
            (sort_by == "path").then(|| Value::String(path.clone()))
        });
        Self {
            path,
            record,
            sort_key,
        }
    }
}

/// Collect every file under `directory/`, in path order
pub fn select(files: &FileCollection, directory: &str, sort_by: &str) -> Vec<SelectedItem> {
    let prefix = format!("{directory}/");
    files
        .iter()
        .filter(|(path, _)| path.starts_with(&prefix))
        .map(|(path, record)| SelectedItem::new(path, record.clone(), sort_by))
        .collect()
}

/// Order two sort keys.
///
/// Absent keys always rank as least recent: last when `reverse` (newest
/// first), first otherwise. Only the comparison of present keys flips with
/// `reverse`.
pub fn compare_sort_keys(a: Option<&Value>, b: Option<&Value>, reverse: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) if reverse => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) if reverse => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) if reverse => compare_present(b, a),
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

/// Order two present keys.
///
/// Strings that read as dates compare by instant and rank before other
/// strings. Everything else uses the natural value ordering.
fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) if b.is_string() => Ordering::Less,
        (None, Some(_)) if a.is_string() => Ordering::Greater,
        _ => compare_values(a, b),
    }
}

/// Stable sort of selected items by their sort key
pub fn sort_items(items: &mut [SelectedItem], reverse: bool) {
    items.sort_by(|a, b| compare_sort_keys(a.sort_key.as_ref(), b.sort_key.as_ref(), reverse));
}

/// Select the files under `directory/` and order them by `sort_by`
pub fn select_sorted(
    files: &FileCollection,
    directory: &str,
    sort_by: &str,
    reverse: bool,
) -> Vec<SelectedItem> {
    let mut items = select(files, directory, sort_by);
    tracing::debug!("Found {} files in directory {}", items.len(), directory);

    sort_items(&mut items, reverse);
    tracing::debug!(
        "Files sorted by {} in {} order",
        sort_by,
        if reverse { "descending" } else { "ascending" }
    );
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(entries: &[(&str, Value)]) -> FileCollection {
        entries
            .iter()
            .map(|(path, fields)| {
                let fields = fields.as_object().cloned().unwrap_or_default();
                (path.to_string(), FileRecord::new(fields, "body"))
            })
            .collect()
    }

    fn paths(items: &[SelectedItem]) -> Vec<&str> {
        items.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn test_select_only_directory_children() {
        let files = collection(&[
            ("blog/a.md", json!({})),
            ("blog.md", json!({})),
            ("blogroll/b.md", json!({})),
            ("about.md", json!({})),
            ("blog/nested/c.md", json!({})),
        ]);
        let items = select(&files, "blog", "date");
        assert_eq!(paths(&items), vec!["blog/a.md", "blog/nested/c.md"]);
    }

    #[test]
    fn test_empty_selection() {
        let files = collection(&[("about.md", json!({}))]);
        assert!(select_sorted(&files, "blog", "date", true).is_empty());
    }

    #[test]
    fn test_sort_descending_and_ascending() {
        let files = collection(&[
            ("blog/a.md", json!({ "date": "2024-05-02" })),
            ("blog/b.md", json!({ "date": "2024-05-03" })),
            ("blog/c.md", json!({ "date": "2024-05-01" })),
        ]);

        let items = select_sorted(&files, "blog", "date", true);
        assert_eq!(paths(&items), vec!["blog/b.md", "blog/a.md", "blog/c.md"]);

        let items = select_sorted(&files, "blog", "date", false);
        assert_eq!(paths(&items), vec!["blog/c.md", "blog/a.md", "blog/b.md"]);
    }

    #[test]
    fn test_dates_with_offsets_sort_by_instant() {
        let files = collection(&[
            // 2024-05-02T04:00:00Z
            ("blog/a.md", json!({ "date": "2024-05-01T23:00:00-05:00" })),
            ("blog/b.md", json!({ "date": "2024-05-02T01:00:00Z" })),
            ("blog/c.md", json!({ "date": "2024-05-02" })),
        ]);

        let items = select_sorted(&files, "blog", "date", true);
        assert_eq!(paths(&items), vec!["blog/a.md", "blog/b.md", "blog/c.md"]);

        let items = select_sorted(&files, "blog", "date", false);
        assert_eq!(paths(&items), vec!["blog/c.md", "blog/b.md", "blog/a.md"]);
    }

    #[test]
    fn test_nested_sort_field() {
        let files = collection(&[
            ("blog/a.md", json!({ "post": { "date": "2024-01-01" } })),
            ("blog/b.md", json!({ "post": { "date": "2024-03-01" } })),
        ]);
        let items = select_sorted(&files, "blog", "post.date", true);
        assert_eq!(paths(&items), vec!["blog/b.md", "blog/a.md"]);
    }

    #[test]
    fn test_missing_sort_field_is_least_recent() {
        let files = collection(&[
            ("blog/a.md", json!({ "date": "2024-05-02" })),
            ("blog/b.md", json!({})),
            ("blog/c.md", json!({ "date": "2024-05-01" })),
        ]);

        // Newest first: the undated item goes last
        let items = select_sorted(&files, "blog", "date", true);
        assert_eq!(paths(&items), vec!["blog/a.md", "blog/c.md", "blog/b.md"]);

        // Oldest first: the undated item goes first
        let items = select_sorted(&files, "blog", "date", false);
        assert_eq!(paths(&items), vec!["blog/b.md", "blog/c.md", "blog/a.md"]);
    }

    #[test]
    fn test_null_is_present_not_absent() {
        let files = collection(&[
            ("blog/a.md", json!({ "date": null })),
            ("blog/b.md", json!({})),
            ("blog/c.md", json!({ "date": "2024-05-01" })),
        ]);
        let items = select_sorted(&files, "blog", "date", true);
        assert_eq!(paths(&items), vec!["blog/c.md", "blog/a.md", "blog/b.md"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let files = collection(&[
            ("blog/a.md", json!({ "date": "2024-05-01" })),
            ("blog/b.md", json!({ "date": "2024-05-01" })),
            ("blog/c.md", json!({})),
            ("blog/d.md", json!({})),
            ("blog/e.md", json!({ "date": "2024-05-01" })),
        ]);
        for reverse in [true, false] {
            let items = select_sorted(&files, "blog", "date", reverse);
            let dated: Vec<_> = paths(&items)
                .into_iter()
                .filter(|p| ["blog/a.md", "blog/b.md", "blog/e.md"].contains(p))
                .collect();
            assert_eq!(dated, vec!["blog/a.md", "blog/b.md", "blog/e.md"]);

            let undated: Vec<_> = paths(&items)
                .into_iter()
                .filter(|p| ["blog/c.md", "blog/d.md"].contains(p))
                .collect();
            assert_eq!(undated, vec!["blog/c.md", "blog/d.md"]);
        }
    }

    #[test]
    fn test_sort_by_path() {
        let files = collection(&[
            ("blog/b.md", json!({})),
            ("blog/a.md", json!({})),
            ("blog/c.md", json!({ "path": "zzz" })),
        ]);
        let items = select_sorted(&files, "blog", "path", false);
        assert_eq!(paths(&items), vec!["blog/a.md", "blog/b.md", "blog/c.md"]);

        let items = select_sorted(&files, "blog", "path", true);
        assert_eq!(paths(&items), vec!["blog/c.md", "blog/b.md", "blog/a.md"]);
    }

    #[test]
    fn test_numeric_sort() {
        let files = collection(&[
            ("blog/a.md", json!({ "order": 10 })),
            ("blog/b.md", json!({ "order": 9 })),
            ("blog/c.md", json!({ "order": 100 })),
        ]);
        let items = select_sorted(&files, "blog", "order", false);
        assert_eq!(paths(&items), vec!["blog/b.md", "blog/a.md", "blog/c.md"]);
    }
}
