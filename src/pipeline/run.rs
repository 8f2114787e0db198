// src/pipeline/run.rs

//! Check every configured source for new postings.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{Config, Posting, SourceEntry};
use crate::notify::Notifier;
use crate::sources::{JobSource, SourceRegistry};
use crate::storage::JobList;

/// Outcome of checking one source.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: String,
    pub jobs_file: PathBuf,
    pub fetched: usize,
    pub new_postings: Vec<Posting>,
}

/// Run the full pipeline.
///
/// Sources are handled one after the other: load state, fetch, diff, save,
/// notify. The first error aborts the run.
pub async fn run_pipeline(
    config: &Config,
    registry: &SourceRegistry,
    notifier: &dyn Notifier,
) -> Result<Vec<SourceReport>> {
    config.validate()?;

    let total = config.sources.len();
    let mut reports = Vec::with_capacity(total);

    for (i, entry) in config.sources.iter().enumerate() {
        log::info!("[STEP {}/{}] Checking '{}'", i + 1, total, entry.name);
        reports.push(run_source(config, registry, entry, notifier).await?);
    }

    let new_total: usize = reports.iter().map(|r| r.new_postings.len()).sum();
    log::info!("Run complete: {} new postings", new_total);

    Ok(reports)
}

/// Check a single source.
pub async fn run_source(
    config: &Config,
    registry: &SourceRegistry,
    entry: &SourceEntry,
    notifier: &dyn Notifier,
) -> Result<SourceReport> {
    let source = registry.construct(&entry.name, &config.http, &entry.options)?;
    let jobs_file = config.jobs_file_for(entry);

    let mut list = JobList::open(&jobs_file).await?;
    log::info!("{} known postings in {}", list.len(), list.file());

    let fetched = fetch_with_deadline(source.as_ref(), config.http.fetch_deadline_secs).await?;
    let fetched_count = fetched.len();

    let new_postings = list.diff_and_save(fetched).await?;
    if new_postings.is_empty() {
        log::info!("No new postings on '{}'", entry.name);
    } else {
        log::info!(
            "{} new postings on '{}', notifying via {}",
            new_postings.len(),
            entry.name,
            notifier.channel_name()
        );
        notifier.notify(&new_postings).await?;
    }

    Ok(SourceReport {
        source: entry.name.clone(),
        jobs_file,
        fetched: fetched_count,
        new_postings,
    })
}

/// Fetch from `source`, giving up after `deadline_secs` when set.
async fn fetch_with_deadline(
    source: &dyn JobSource,
    deadline_secs: Option<u64>,
) -> Result<Vec<Posting>> {
    let Some(secs) = deadline_secs else {
        return source.fetch().await;
    };

    tokio::time::timeout(Duration::from_secs(secs), source.fetch())
        .await
        .map_err(|_| AppError::Timeout {
            source_name: source.name().to_string(),
            secs,
        })?
}
