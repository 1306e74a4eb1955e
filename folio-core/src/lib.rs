//! # folio-core
//!
//! Core library for the folio content paginator.
//!
//! This crate groups a directory of content files into fixed-size pages,
//! relocates each item to its own output directory and gives every page an
//! index record carrying navigation metadata. It also provides the thin
//! host around it: configuration, source loading, a plugin pipeline and
//! output writing.

pub mod builder;
pub mod config;
pub mod frontmatter;
pub mod paginate;
pub mod pipeline;
pub mod source;

pub use builder::{BuildError, BuildReport, SiteBuilder};
pub use config::{Config, ConfigError, PaginationOptions};
pub use folio_types::{FileCollection, FileRecord, Metadata};
pub use paginate::{
    FileDetail, PageUrls, PaginateError, PaginationMetadata, PaginationPlan, Paginator, UrlScheme,
};
pub use pipeline::{Drafts, Pipeline, Plugin, PluginError};
