//! Building page index records and item moves.
//!
//! Everything here works on a snapshot of the selected items and produces a
//! [`PagePlan`]; nothing touches the file collection until the plan is
//! applied.

use super::date::{first_date, format_date};
use super::paths::{collection_key, item_listing_url, item_output_path};
use super::select::SelectedItem;
use super::urls::{page_urls, resolve_pattern, PageUrls, UrlScheme};
use super::PaginateError;
use crate::config::PaginationOptions;
use chrono::{DateTime, Utc};
use folio_types::{FileRecord, Metadata};
use serde::Serialize;
use serde_json::{json, Value};

/// Item entry listed in a page's metadata, without contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDetail {
    /// Clean URL of the item after it has been moved
    pub path: String,

    #[serde(flatten)]
    pub fields: Metadata,
}

impl FileDetail {
    pub fn new(item: &SelectedItem, output_path: &str) -> Self {
        let mut fields = item.record.fields.clone();
        fields.remove("path");
        Self {
            path: item_listing_url(output_path),
            fields,
        }
    }
}

/// The `pagination` block attached to every index record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationMetadata {
    pub name: String,
    pub num: usize,
    pub pages: usize,
    pub files: Vec<FileDetail>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub first: String,
    pub last: String,
}

impl PaginationMetadata {
    fn new(name: &str, num: usize, pages: usize, files: Vec<FileDetail>, urls: PageUrls) -> Self {
        Self {
            name: name.to_string(),
            num,
            pages,
            files,
            next: urls.next,
            previous: urls.previous,
            first: urls.first,
            last: urls.last,
        }
    }
}

/// Relocation of one item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemMove {
    pub from: String,
    pub to: String,
    /// Record to store at `to`, already annotated with page information
    pub record: FileRecord,
}

/// What a page does to its index file
#[derive(Debug, Clone, PartialEq)]
pub enum IndexUpdate {
    /// Pages after the first get a brand new index record
    Create { path: String, record: FileRecord },

    /// Page one decorates an existing file, when it is present
    Attach {
        path: String,
        pagination: Value,
        page_files: Value,
        date: String,
    },
}

impl IndexUpdate {
    pub fn path(&self) -> &str {
        match self {
            IndexUpdate::Create { path, .. } | IndexUpdate::Attach { path, .. } => path,
        }
    }
}

/// All changes one page makes to the collection
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub number: usize,
    pub moves: Vec<ItemMove>,
    pub metadata: PaginationMetadata,
    pub index: IndexUpdate,
}

/// Inputs shared by every page of one pagination pass
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub options: &'a PaginationOptions,
    /// Directory with surrounding slashes removed
    pub directory: &'a str,
    pub total_pages: usize,
    pub global: &'a Metadata,
    pub now: DateTime<Utc>,
}

impl PageContext<'_> {
    fn urls(&self, page: usize) -> PageUrls {
        page_urls(
            self.directory,
            &self.options.output_dir,
            page,
            self.total_pages,
            UrlScheme::from_permalinks(self.options.use_permalinks),
        )
    }

    /// Collection key of the index file for a page after the first
    pub fn index_path(&self, page: usize) -> String {
        let page_dir = resolve_pattern(&self.options.output_dir, self.directory, page);
        collection_key(&format!("{page_dir}/index.html"))
    }

    /// Most recent date on a page: the first item whose sort field resolves
    /// to a date, otherwise the current time
    fn most_recent_date(&self, items: &[SelectedItem]) -> DateTime<Utc> {
        first_date(items.iter().map(|item| item.sort_key.as_ref())).unwrap_or(self.now)
    }

    fn stats(&self) -> Value {
        let now = format_date(&self.now);
        json!({
            "atime": now,
            "mtime": now,
            "ctime": now,
            "birthtime": now,
        })
    }
}

/// Plan the moves for a page's items and collect their listing details
fn plan_moves(
    ctx: &PageContext<'_>,
    number: usize,
    items: &[SelectedItem],
) -> (Vec<ItemMove>, Vec<FileDetail>) {
    let mut moves = Vec::with_capacity(items.len());
    let mut details = Vec::with_capacity(items.len());

    for item in items {
        let to = item_output_path(ctx.directory, &item.path);
        tracing::debug!("Moving file from {} to {}", item.path, to);

        let mut record = item.record.clone();
        record.set("originalPath", Value::String(item.path.clone()));
        record.set("pageNumber", json!(number));
        record.set("totalPages", json!(ctx.total_pages));

        details.push(FileDetail::new(item, &to));
        moves.push(ItemMove {
            from: item.path.clone(),
            to,
            record,
        });
    }

    (moves, details)
}

/// Plan a page after the first: move its items and mint a new index record
pub fn assemble_page(
    ctx: &PageContext<'_>,
    number: usize,
    items: &[SelectedItem],
) -> Result<PagePlan, PaginateError> {
    let index_path = ctx.index_path(number);
    tracing::debug!("Processing page {} with index: {}", number, index_path);

    let (moves, details) = plan_moves(ctx, number, items);
    let date = ctx.most_recent_date(items);

    let urls = ctx.urls(number);
    tracing::debug!(
        "Pagination URLs for page {}: first={}, prev={:?}, next={:?}, last={}",
        number,
        urls.first,
        urls.previous,
        urls.next,
        urls.last
    );

    let metadata = PaginationMetadata::new(ctx.directory, number, ctx.total_pages, details, urls);

    // Global metadata sits underneath; pagination fields always win
    let mut fields = ctx.global.clone();
    fields.insert("pagination".to_string(), serde_json::to_value(&metadata)?);
    fields.insert("pageFiles".to_string(), serde_json::to_value(&metadata.files)?);
    fields.insert("date".to_string(), Value::String(format_date(&date)));
    fields.insert("stats".to_string(), ctx.stats());
    fields.insert(
        "layout".to_string(),
        Value::String(ctx.options.index_layout.clone()),
    );

    Ok(PagePlan {
        number,
        moves,
        metadata,
        index: IndexUpdate::Create {
            path: index_path,
            record: FileRecord::from_fields(fields),
        },
    })
}

/// Plan page one: move its items and decorate the configured first index file
pub fn assemble_first_page(
    ctx: &PageContext<'_>,
    items: &[SelectedItem],
) -> Result<PagePlan, PaginateError> {
    tracing::debug!("Processing first page with {} files", items.len());

    let (moves, details) = plan_moves(ctx, 1, items);
    let date = ctx.most_recent_date(items);

    let mut urls = ctx.urls(1);
    urls.previous = None;
    tracing::debug!(
        "Pagination URLs for first page: first={}, next={:?}, last={}",
        urls.first,
        urls.next,
        urls.last
    );

    let metadata = PaginationMetadata::new(ctx.directory, 1, ctx.total_pages, details, urls);

    Ok(PagePlan {
        number: 1,
        moves,
        index: IndexUpdate::Attach {
            path: ctx.options.first_index_file.clone(),
            pagination: serde_json::to_value(&metadata)?,
            page_files: serde_json::to_value(&metadata.files)?,
            date: format_date(&date),
        },
        metadata,
    })
}

/// A first index record keeps its own date unless it is missing, blank,
/// `false` or zero
pub(crate) fn has_date(record: &FileRecord) -> bool {
    match record.fields.get("date") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
