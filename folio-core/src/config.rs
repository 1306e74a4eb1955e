//! Configuration parsing and management.

use folio_types::Metadata;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Main configuration struct matching the folio.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_source")]
    pub source: PathBuf,

    #[serde(default = "default_destination")]
    pub destination: PathBuf,

    /// Directory of JSON files merged into global metadata
    #[serde(default)]
    pub data: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub clean: bool,

    /// Keep files marked `draft: true`
    #[serde(default)]
    pub drafts: bool,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub pagination: Vec<PaginationOptions>,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_source() -> PathBuf {
    PathBuf::from("src")
}

fn default_destination() -> PathBuf {
    PathBuf::from("build")
}

fn default_true() -> bool {
    true
}

/// Options for a single paginated directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationOptions {
    /// Directory containing the items to paginate
    pub directory: String,

    pub per_page: usize,

    /// Field to sort by; dots address nested fields ("post.date")
    pub sort_by: String,

    /// Sort newest first
    pub reverse: bool,

    /// Pattern for page directories; supports `:directory` and `:num`
    pub output_dir: String,

    pub index_layout: String,

    /// Existing file that becomes page one
    pub first_index_file: String,

    pub use_permalinks: bool,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            directory: "blog".to_string(),
            per_page: 10,
            sort_by: "date".to_string(),
            reverse: true,
            output_dir: ":directory/:num".to_string(),
            index_layout: "blog-index.njk".to_string(),
            first_index_file: "blog.md".to_string(),
            use_permalinks: true,
        }
    }
}

impl PaginationOptions {
    /// Check the options for values that cannot produce a valid pagination
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(invalid("perPage", "must be greater than zero"));
        }
        if self.directory.trim_matches('/').is_empty() {
            return Err(invalid("directory", "must not be empty"));
        }
        if !self.output_dir.contains(":num") {
            return Err(invalid(
                "outputDir",
                "must contain the :num placeholder so pages get distinct paths",
            ));
        }
        if has_parent_segment(&self.directory) {
            return Err(invalid("directory", "must not contain '..' segments"));
        }
        if has_parent_segment(&self.output_dir) {
            return Err(invalid("outputDir", "must not contain '..' segments"));
        }
        Ok(())
    }
}

fn has_parent_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: default_source(),
            destination: default_destination(),
            data: None,
            clean: true,
            drafts: false,
            metadata: Metadata::new(),
            pagination: Vec::new(),
            config_path: None,
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

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for options in &self.pagination {
            options.validate()?;
        }
        Ok(())
    }

    /// Get the source directory, resolved relative to config file
    pub fn source_dir(&self) -> PathBuf {
        self.resolve_path(&self.source)
    }

    /// Get the destination directory, resolved relative to config file
    pub fn destination_dir(&self) -> PathBuf {
        self.resolve_path(&self.destination)
    }

    /// Get the data directory, resolved relative to config file
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data.as_ref().map(|p| self.resolve_path(p))
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
}
