//! Plan command implementation.

use anyhow::{Context, Result};
use folio_core::{Config, PaginationPlan, SiteBuilder};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanSummary {
    directory: String,
    total_pages: usize,
    pages: Vec<PageSummary>,
}

#[derive(Serialize)]
struct PageSummary {
    number: usize,
    index: String,
    previous: Option<String>,
    next: Option<String>,
    items: Vec<MoveSummary>,
}

#[derive(Serialize)]
struct MoveSummary {
    from: String,
    to: String,
}

impl From<&PaginationPlan> for PlanSummary {
    fn from(plan: &PaginationPlan) -> Self {
        Self {
            directory: plan.directory.clone(),
            total_pages: plan.total_pages,
            pages: plan
                .pages
                .iter()
                .map(|page| PageSummary {
                    number: page.number,
                    index: page.index.path().to_string(),
                    previous: page.metadata.previous.clone(),
                    next: page.metadata.next.clone(),
                    items: page
                        .moves
                        .iter()
                        .map(|mv| MoveSummary {
                            from: mv.from.clone(),
                            to: mv.to.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Print the pagination each configured directory would receive
pub fn show_plan(config_path: &Path, json: bool) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let plans = SiteBuilder::new(config)
        .plan()
        .context("Failed to plan pagination")?;
    let summaries: Vec<PlanSummary> = plans.iter().map(PlanSummary::from).collect();

    if json {
        let payload = serde_json::to_string_pretty(&summaries)?;
        println!("{}", payload);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("Nothing to paginate");
        return Ok(());
    }

    for summary in &summaries {
        println!("{} ({} pages)", summary.directory, summary.total_pages);
        for page in &summary.pages {
            println!("  page {} -> {}", page.number, page.index);
            for item in &page.items {
                println!("    {} -> {}", item.from, item.to);
            }
        }
    }

    Ok(())
}
