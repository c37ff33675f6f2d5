//! CLI runner - downloads the dataset and runs the sampling pipeline

use crate::cli::commands::Cli;
use crate::config::SamplerConfig;
use crate::engine::{Pipeline, PipelineStats};
use crate::error::{Error, Result, ResultExt};
use crate::hub::{select_categories, DatasetRepo};
use crate::output::create_sink;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Categories processed, in order
    pub categories: Vec<String>,
    /// Output file
    pub output: PathBuf,
    /// Data rows written
    pub rows_written: usize,
    /// Per-category counters
    pub stats: PipelineStats,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the sampler end to end
    pub async fn run(&self) -> Result<RunSummary> {
        let config = self.cli.resolve_config()?;
        let repo = DatasetRepo::new(config.hub.clone())?;

        let available = repo.fetch_categories().await?;
        let selection = select_categories(&available, &self.cli.category, self.cli.all_categories);
        if let Err(Error::CategoryNotFound { available, .. }) = &selection {
            println!("\nAvailable categories:");
            for category in available {
                println!("{category}");
            }
        }
        let categories = selection?;

        if self.cli.all_categories {
            println!("Processing all {} categories:", categories.len());
            for category in &categories {
                println!("- {category}");
            }
        } else {
            println!("Processing single category: {}", categories.join(", "));
        }

        let meta_paths: Vec<String> = categories
            .iter()
            .map(|c| config.hub.meta_path(c))
            .collect();
        let review_paths: Vec<String> = categories
            .iter()
            .map(|c| config.hub.review_path(c))
            .collect();

        let meta_files = repo.fetch_all(&meta_paths).await?;
        let review_files = repo.fetch_all(&review_paths).await?;

        let summary = tokio::task::spawn_blocking(move || {
            process_categories(&config, &categories, &meta_files, &review_files)
        })
        .await
        .map_err(|e| Error::WorkerPool {
            message: format!("processing task failed: {e}"),
        })??;

        let totals = summary.stats.totals();
        println!(
            "Wrote {} rows to {} ({} of {} reviews kept)",
            summary.rows_written,
            summary.output.display(),
            totals.reviews_kept,
            totals.reviews_seen
        );
        Ok(summary)
    }
}

/// Build the metadata index from every category, then sample every
/// category's reviews into the configured output
///
/// `meta_files` and `review_files` are parallel to `categories`.
pub fn process_categories(
    config: &SamplerConfig,
    categories: &[String],
    meta_files: &[PathBuf],
    review_files: &[PathBuf],
) -> Result<RunSummary> {
    if meta_files.len() != categories.len() || review_files.len() != categories.len() {
        return Err(Error::config(
            "Expected one metadata file and one review file per category",
        ));
    }

    let mut pipeline = Pipeline::new(config)?;

    for (category, path) in categories.iter().zip(meta_files) {
        pipeline
            .load_metadata(category, open(path)?)
            .with_context(|| format!("{category} metadata ({})", path.display()))?;
    }
    info!("Metadata index holds {} items", pipeline.index().len());

    match DateTime::<Utc>::from_timestamp_millis(config.sampling.valid_timestamp) {
        Some(cutoff) => info!("Keeping reviews written before {}", cutoff.to_rfc3339()),
        None => debug!("Review cutoff {} ms", config.sampling.valid_timestamp),
    }

    let mut sink = create_sink(&config.output)?;
    for (category, path) in categories.iter().zip(review_files) {
        pipeline
            .sample_reviews(category, open(path)?, sink.as_mut())
            .with_context(|| format!("{category} reviews ({})", path.display()))?;
    }
    let rows_written = sink.finish()?;

    let stats = pipeline.stats().clone();
    for category in &stats.categories {
        info!(
            "{}: {} of {} items indexed, {} of {} reviews kept",
            category.category,
            category.metadata_kept,
            category.metadata_seen,
            category.reviews_kept,
            category.reviews_seen
        );
    }
    info!(
        "Processed {} categories in {:.1}s",
        categories.len(),
        stats.elapsed_ms as f64 / 1000.0
    );

    Ok(RunSummary {
        categories: categories.to_vec(),
        output: config.output.path.clone(),
        rows_written,
        stats,
    })
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}
