//! Site building logic - loads sources, runs the plugin pipeline, writes output.

use crate::{
    config::Config,
    paginate::{PaginateError, PaginationPlan, Paginator},
    pipeline::{Drafts, Pipeline, Plugin, PluginError},
    source::{load_collection, load_data_dir, write_collection, write_manifest, SourceError},
};
use chrono::Utc;
use folio_types::{FileCollection, Metadata};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Pagination error: {0}")]
    Paginate(#[from] PaginateError),

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

/// Summary of a finished build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub files_written: usize,
    pub destination: PathBuf,
    pub manifest: Option<PathBuf>,
}

/// Main site builder
pub struct SiteBuilder {
    config: Config,
}

impl SiteBuilder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Global metadata: data files, then config metadata merged on top.
    ///
    /// Objects present in both are merged key by key; the config wins for
    /// every other value.
    pub fn global_metadata(&self) -> Result<Metadata, SourceError> {
        let mut metadata = Metadata::new();
        metadata.insert(
            "folioVersion".to_string(),
            Value::String(env!("CARGO_PKG_VERSION").to_string()),
        );

        if let Some(dir) = self.config.data_dir() {
            metadata.extend(load_data_dir(&dir)?);
        }
        merge_metadata(&mut metadata, &self.config.metadata);

        Ok(metadata)
    }

    fn paginators(&self) -> Result<Vec<Paginator>, PaginateError> {
        self.config
            .pagination
            .iter()
            .cloned()
            .map(Paginator::new)
            .collect()
    }

    /// Assemble the plugin chain for this configuration
    pub fn pipeline(&self, metadata: Metadata) -> Result<Pipeline, PaginateError> {
        let mut pipeline = Pipeline::new(metadata).with(Drafts::new(self.config.drafts));
        for paginator in self.paginators()? {
            pipeline = pipeline.with(paginator);
        }
        Ok(pipeline)
    }

    /// Load the source tree and run the pipeline over it, in memory
    pub fn process(&self) -> Result<FileCollection, BuildError> {
        let metadata = self.global_metadata()?;
        let pipeline = self.pipeline(metadata)?;

        let mut files = load_collection(&self.config.source_dir())?;
        pipeline.run(&mut files)?;
        Ok(files)
    }

    /// Plan every configured pagination without writing anything.
    ///
    /// Each plan is applied to a working copy before the next one is made,
    /// so later directories see the effect of earlier ones.
    pub fn plan(&self) -> Result<Vec<PaginationPlan>, BuildError> {
        let metadata = self.global_metadata()?;
        let mut files = load_collection(&self.config.source_dir())?;
        Drafts::new(self.config.drafts).run(&mut files, &metadata)?;

        let now = Utc::now();
        let mut plans = Vec::new();
        for paginator in self.paginators()? {
            if let Some(plan) = paginator.plan(&files, &metadata, now)? {
                plan.clone().apply(&mut files);
                plans.push(plan);
            }
        }
        Ok(plans)
    }

    /// Build the site: process sources and write the result
    pub fn build(&self, with_manifest: bool) -> Result<BuildReport, BuildError> {
        let files = self.process()?;

        let destination = self.config.destination_dir();
        let files_written = write_collection(&files, &destination, self.config.clean)?;

        let manifest = if with_manifest {
            let path = destination.join("manifest.json");
            write_manifest(&files, &path)?;
            Some(path)
        } else {
            None
        };

        Ok(BuildReport {
            files_written,
            destination,
            manifest,
        })
    }
}

fn merge_metadata(target: &mut Metadata, overlay: &Metadata) {
    for (key, value) in overlay {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_metadata(existing, incoming)
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
