//! Reading a source tree into a file collection and writing it back out.

use crate::frontmatter::parse_frontmatter;
use folio_types::{FileCollection, FileRecord, Metadata};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SourceError + '_ {
    move |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load every file below `root` into a collection.
///
/// Keys are `/`-separated paths relative to `root`. Markdown files have
/// their frontmatter parsed into fields and the body kept as contents.
/// Other files, and markdown whose frontmatter does not parse, keep their
/// raw bytes and no fields.
pub fn load_collection(root: &Path) -> Result<FileCollection, SourceError> {
    let mut files = FileCollection::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(path);
        let key = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let bytes = fs::read(path).map_err(io_error(path))?;
        let record = if is_markdown(path) {
            let text = String::from_utf8_lossy(&bytes);
            match parse_frontmatter(&text) {
                Ok((fields, body)) => FileRecord::new(fields, body),
                Err(e) => {
                    tracing::warn!("Keeping {} as raw content: {}", key, e);
                    FileRecord::new(Metadata::new(), bytes)
                }
            }
        } else {
            FileRecord::new(Metadata::new(), bytes)
        };

        tracing::debug!("Loaded {}", key);
        files.insert(key, record);
    }

    tracing::info!("Found {} source files", files.len());
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Load global metadata from a directory of JSON files.
///
/// Each `name.json` becomes the top-level key `name`.
pub fn load_data_dir(dir: &Path) -> Result<Metadata, SourceError> {
    let mut metadata = Metadata::new();

    let mut entries = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect::<Vec<_>>();
    entries.sort();

    for path in entries {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };
        let text = fs::read_to_string(&path).map_err(io_error(&path))?;
        let value: Value = serde_json::from_str(&text).map_err(|source| SourceError::Json {
            path: path.clone(),
            source,
        })?;
        metadata.insert(stem, value);
    }

    Ok(metadata)
}

/// Write every record's contents below `destination`.
///
/// With `clean`, the destination is removed first.
pub fn write_collection(
    files: &FileCollection,
    destination: &Path,
    clean: bool,
) -> Result<usize, SourceError> {
    if clean && destination.exists() {
        fs::remove_dir_all(destination).map_err(io_error(destination))?;
    }
    fs::create_dir_all(destination).map_err(io_error(destination))?;

    let mut written = 0;
    for (key, record) in files.iter() {
        let target = destination.join(key);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        fs::write(&target, &record.contents).map_err(io_error(&target))?;
        written += 1;
    }

    tracing::info!("Wrote {} files to {:?}", written, destination);
    Ok(written)
}

/// Write a JSON manifest mapping each path to its fields
pub fn write_manifest(files: &FileCollection, path: &Path) -> Result<(), SourceError> {
    let manifest: serde_json::Map<String, Value> = files
        .iter()
        .map(|(key, record)| (key.to_string(), Value::Object(record.fields.clone())))
        .collect();
    let json = serde_json::to_string_pretty(&manifest).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(io_error(path))
}
