//! Pagination of a content directory.
//!
//! A pass selects the files under a directory, sorts them, splits them into
//! pages, moves every item to `directory/<name>/index.<ext>` and gives each
//! page an index record carrying a `pagination` block. Page one reuses an
//! existing file (`firstIndexFile`) instead of minting a new index.
//!
//! The pass is planned against an immutable view of the collection and then
//! applied, so a failing pass leaves the collection untouched.

pub mod assemble;
pub mod chunk;
pub mod date;
pub mod paths;
pub mod select;
pub mod urls;

use crate::config::{ConfigError, PaginationOptions};
use crate::pipeline::{Plugin, PluginError};
use assemble::{assemble_first_page, assemble_page, has_date, IndexUpdate, PageContext, PagePlan};
use chrono::{DateTime, Utc};
use folio_types::{FileCollection, Metadata};
use serde_json::Value;
use thiserror::Error;

pub use assemble::{FileDetail, PaginationMetadata};
pub use urls::{PageUrls, UrlScheme};

#[derive(Error, Debug)]
pub enum PaginateError {
    #[error("Invalid pagination options: {0}")]
    InvalidOptions(#[from] ConfigError),

    #[error("Failed to build pagination metadata: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Every change one pagination pass makes, ready to apply
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationPlan {
    pub directory: String,
    pub total_pages: usize,
    /// Page one first, then pages 2..N in order
    pub pages: Vec<PagePlan>,
}

impl PaginationPlan {
    /// Commit the plan to the collection.
    ///
    /// Source paths are removed first. Pages 2..N are then written in order,
    /// and page one is applied last.
    pub fn apply(self, files: &mut FileCollection) {
        for page in &self.pages {
            for mv in &page.moves {
                files.remove(&mv.from);
            }
        }

        let mut pages = self.pages.into_iter();
        let first = pages.next();

        for page in pages {
            commit_moves(files, &page);
            if let IndexUpdate::Create { path, record } = page.index {
                files.insert(path.clone(), record);
                tracing::debug!("Created index file: {}", path);
            }
        }

        if let Some(page) = first {
            commit_moves(files, &page);
            attach_first_index(files, page.index);
        }
    }
}

fn commit_moves(files: &mut FileCollection, page: &PagePlan) {
    for mv in &page.moves {
        if files.insert(mv.to.clone(), mv.record.clone()).is_some() {
            tracing::warn!("Paginated item {} overwrote an existing file at {}", mv.from, mv.to);
        }
    }
}

fn attach_first_index(files: &mut FileCollection, index: IndexUpdate) {
    let IndexUpdate::Attach {
        path,
        pagination,
        page_files,
        date,
    } = index
    else {
        return;
    };

    let Some(record) = files.get_mut(&path) else {
        tracing::debug!(
            "First page file {} does not exist, skipping first page metadata update",
            path
        );
        return;
    };

    tracing::debug!("Adding pagination metadata to first page file: {}", path);
    record.set("pagination", pagination);
    record.set("pageFiles", page_files);
    if !has_date(record) {
        record.set("date", Value::String(date));
    }
}

/// Paginates one directory of a file collection
#[derive(Debug, Clone)]
pub struct Paginator {
    options: PaginationOptions,
}

impl Paginator {
    /// Create a paginator, rejecting options that cannot paginate
    pub fn new(options: PaginationOptions) -> Result<Self, PaginateError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    fn directory(&self) -> &str {
        self.options.directory.trim_matches('/')
    }

    /// Plan a pass without touching the collection.
    ///
    /// Returns `None` when no file lives under the directory.
    pub fn plan(
        &self,
        files: &FileCollection,
        global: &Metadata,
        now: DateTime<Utc>,
    ) -> Result<Option<PaginationPlan>, PaginateError> {
        let directory = self.directory();
        let items = select::select_sorted(
            files,
            directory,
            &self.options.sort_by,
            self.options.reverse,
        );
        if items.is_empty() {
            tracing::debug!("No files found in directory {}, skipping pagination", directory);
            return Ok(None);
        }

        let chunks = chunk::chunk(items, self.options.per_page)?;
        let total_pages = chunks.len();
        tracing::debug!(
            "Created {} pages with {} items per page",
            total_pages,
            self.options.per_page
        );

        let ctx = PageContext {
            options: &self.options,
            directory,
            total_pages,
            global,
            now,
        };

        let mut pages = Vec::with_capacity(total_pages);
        for (idx, page_items) in chunks.iter().enumerate() {
            let number = idx + 1;
            let page = if number == 1 {
                assemble_first_page(&ctx, page_items)?
            } else {
                assemble_page(&ctx, number, page_items)?
            };
            pages.push(page);
        }

        Ok(Some(PaginationPlan {
            directory: directory.to_string(),
            total_pages,
            pages,
        }))
    }

    /// Paginate the collection in place, returning the number of pages
    pub fn paginate(
        &self,
        files: &mut FileCollection,
        global: &Metadata,
    ) -> Result<usize, PaginateError> {
        self.paginate_at(files, global, Utc::now())
    }

    /// Like [`Paginator::paginate`] with an explicit timestamp for
    /// synthesized dates and file stats
    pub fn paginate_at(
        &self,
        files: &mut FileCollection,
        global: &Metadata,
        now: DateTime<Utc>,
    ) -> Result<usize, PaginateError> {
        tracing::debug!("Starting pagination with options: {:?}", self.options);

        let Some(plan) = self.plan(files, global, now)? else {
            return Ok(0);
        };

        let total_pages = plan.total_pages;
        plan.apply(files);

        tracing::info!(
            "Paginated {} into {} page(s)",
            self.directory(),
            total_pages
        );
        Ok(total_pages)
    }
}

impl Plugin for Paginator {
    fn name(&self) -> &str {
        "pagination"
    }

    fn run(&self, files: &mut FileCollection, metadata: &Metadata) -> Result<(), PluginError> {
        self.paginate(files, metadata)
            .map(|_| ())
            .map_err(|e| PluginError::new(self.name(), e))
    }
}
