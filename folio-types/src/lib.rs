//! Shared types for folio
//!
//! This crate provides the in-memory file model that every build step
//! operates on: a collection of virtual paths mapped to records carrying
//! free-form metadata and a raw content payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Free-form metadata attached to a file or to the whole site.
pub type Metadata = serde_json::Map<String, Value>;

/// A single virtual file: metadata fields plus opaque contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default)]
    pub fields: Metadata,

    #[serde(default, skip_serializing)]
    pub contents: Vec<u8>,
}

impl FileRecord {
    pub fn new(fields: Metadata, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            fields,
            contents: contents.into(),
        }
    }

    /// Record with metadata only and empty contents
    pub fn from_fields(fields: Metadata) -> Self {
        Self {
            fields,
            contents: Vec::new(),
        }
    }

    /// Look up a (possibly dotted) field path
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.fields, path)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }
}

/// Mapping from virtual path to record.
///
/// Paths are unique; inserting an existing path replaces its record.
/// Iteration is ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileCollection(BTreeMap<String, FileRecord>);

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.0.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FileRecord> {
        self.0.get_mut(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    /// Insert a record, returning the one it replaced
    pub fn insert(&mut self, path: impl Into<String>, record: FileRecord) -> Option<FileRecord> {
        self.0.insert(path.into(), record)
    }

    pub fn remove(&mut self, path: &str) -> Option<FileRecord> {
        self.0.remove(path)
    }

    /// Move a record to a new path, returning false if the source is missing
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> bool {
        match self.0.remove(from) {
            Some(record) => {
                self.0.insert(to.into(), record);
                true
            }
            None => false,
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileRecord)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the records for which the predicate holds
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &FileRecord) -> bool) {
        self.0.retain(|path, record| keep(path, record));
    }
}

impl FromIterator<(String, FileRecord)> for FileCollection {
    fn from_iter<I: IntoIterator<Item = (String, FileRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FileCollection {
    type Item = (String, FileRecord);
    type IntoIter = std::collections::btree_map::IntoIter<String, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Resolve a dotted field path (e.g. "post.date") against a metadata map.
///
/// Returns `None` when any segment is missing. A present `null`, `false`
/// or `0` is returned as `Some`. Numeric segments index into arrays.
///
/// # Example
///
/// ```
/// use folio_types::lookup;
/// use serde_json::json;
///
/// let fields = json!({ "post": { "date": "2024-05-01", "draft": false } });
/// let fields = fields.as_object().unwrap();
///
/// assert_eq!(lookup(fields, "post.date"), Some(&json!("2024-05-01")));
/// assert_eq!(lookup(fields, "post.draft"), Some(&json!(false)));
/// assert_eq!(lookup(fields, "post.missing"), None);
/// ```
pub fn lookup<'a>(fields: &'a Metadata, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = fields.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Natural ordering over metadata values.
///
/// Values of the same kind compare naturally (numbers numerically, strings
/// lexicographically, arrays element-wise). Values of different kinds are
/// ranked null < bool < number < string < array < object.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                match compare_values(l, r) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(_), Value::Object(_)) => Ordering::Equal,
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
