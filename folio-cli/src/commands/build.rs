//! Build command implementation.

use anyhow::{Context, Result};
use folio_core::{Config, SiteBuilder};
use std::path::Path;

/// Paginate the source tree and write the destination directory
pub fn build_site(config_path: &Path, with_manifest: bool) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("Failed to load configuration")?;

    tracing::info!("Building from {:?}", config.source_dir());
    let builder = SiteBuilder::new(config);
    let report = builder.build(with_manifest).context("Failed to build site")?;

    tracing::info!("✓ Wrote {} files", report.files_written);
    tracing::info!("✓ Output written to {:?}", report.destination);
    if let Some(manifest) = &report.manifest {
        tracing::info!("✓ Manifest written to {:?}", manifest);
    }

    Ok(())
}
