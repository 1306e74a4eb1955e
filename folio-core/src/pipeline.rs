//! Build pipeline: an ordered list of plugins run over one file collection
//!
//! Flow: Source → Drafts → Pagination → ... → Destination
//!
//! Each plugin runs once, synchronously, with exclusive access to the
//! collection. A plugin reports completion through its `Result`: `Ok(())`
//! on success or a single [`PluginError`] that fails the whole build.

use folio_types::{FileCollection, Metadata};
use serde_json::Value;

/// A build step over the file collection
pub trait Plugin {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    fn run(&self, files: &mut FileCollection, metadata: &Metadata) -> Result<(), PluginError>;
}

/// Failure reported by a plugin
#[derive(Debug, thiserror::Error)]
#[error("{plugin} failed: {source}")]
pub struct PluginError {
    pub plugin: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl PluginError {
    pub fn new(
        plugin: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            source: source.into(),
        }
    }
}

/// Ordered plugin chain sharing global metadata
#[derive(Default)]
pub struct Pipeline {
    metadata: Metadata,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            plugins: Vec::new(),
        }
    }

    /// Append a plugin to the chain
    pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run every plugin in order, stopping at the first failure
    pub fn run(&self, files: &mut FileCollection) -> Result<(), PluginError> {
        for plugin in &self.plugins {
            tracing::debug!("Running plugin {}", plugin.name());
            if let Err(err) = plugin.run(files, &self.metadata) {
                tracing::error!("Error in {} plugin: {}", plugin.name(), err.source);
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Removes files whose `draft` field is `true`
#[derive(Debug, Clone, Copy, Default)]
pub struct Drafts {
    /// Keep drafts instead of removing them
    pub include: bool,
}

impl Drafts {
    pub fn new(include: bool) -> Self {
        Self { include }
    }
}

impl Plugin for Drafts {
    fn name(&self) -> &str {
        "drafts"
    }

    fn run(&self, files: &mut FileCollection, _metadata: &Metadata) -> Result<(), PluginError> {
        if self.include {
            return Ok(());
        }

        let before = files.len();
        files.retain(|path, record| {
            let draft = record.fields.get("draft") == Some(&Value::Bool(true));
            if draft {
                tracing::debug!("Skipping draft: {}", path);
            }
            !draft
        });
        tracing::info!("Removed {} draft(s)", before - files.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::FileRecord;
    use serde_json::json;

    fn record(fields: Value) -> FileRecord {
        FileRecord::from_fields(fields.as_object().cloned().unwrap_or_default())
    }

    struct Touch(&'static str);

    impl Plugin for Touch {
        fn name(&self) -> &str {
            self.0
        }

        fn run(&self, files: &mut FileCollection, metadata: &Metadata) -> Result<(), PluginError> {
            let mut fields = metadata.clone();
            fields.insert("seen".into(), json!(files.len()));
            files.insert(self.0, FileRecord::from_fields(fields));
            Ok(())
        }
    }

    struct Fail;

    impl Plugin for Fail {
        fn name(&self) -> &str {
            "fail"
        }

        fn run(&self, _files: &mut FileCollection, _metadata: &Metadata) -> Result<(), PluginError> {
            Err(PluginError::new(self.name(), "boom"))
        }
    }

    #[test]
    fn test_drafts_removed() {
        let mut files = FileCollection::new();
        files.insert("a.md", record(json!({ "draft": true })));
        files.insert("b.md", record(json!({ "draft": false })));
        files.insert("c.md", record(json!({})));

        Drafts::new(false).run(&mut files, &Metadata::new()).unwrap();
        assert_eq!(files.paths().collect::<Vec<_>>(), vec!["b.md", "c.md"]);
    }

    #[test]
    fn test_drafts_kept_when_included() {
        let mut files = FileCollection::new();
        files.insert("a.md", record(json!({ "draft": true })));

        Drafts::new(true).run(&mut files, &Metadata::new()).unwrap();
        assert!(files.contains("a.md"));
    }

    #[test]
    fn test_pipeline_runs_in_order_with_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("site".into(), json!("example"));

        let pipeline = Pipeline::new(metadata).with(Touch("one")).with(Touch("two"));
        assert_eq!(pipeline.plugin_names(), vec!["one", "two"]);

        let mut files = FileCollection::new();
        pipeline.run(&mut files).unwrap();

        assert_eq!(files.get("one").unwrap().fields["seen"], 0);
        assert_eq!(files.get("two").unwrap().fields["seen"], 1);
        assert_eq!(files.get("two").unwrap().fields["site"], "example");
    }

    #[test]
    fn test_pipeline_stops_at_first_failure() {
        let pipeline = Pipeline::default().with(Fail).with(Touch("after"));
        let mut files = FileCollection::new();

        let err = pipeline.run(&mut files).unwrap_err();
        assert_eq!(err.plugin, "fail");
        assert_eq!(err.to_string(), "fail failed: boom");
        assert!(files.is_empty());
    }
}
