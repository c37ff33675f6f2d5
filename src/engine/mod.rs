//! Execution engine module
//!
//! Record-level processing for a sampling run.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Pipeline` - Cleans, filters and indexes records on a worker pool
//! - `MetadataIndex` - Item metadata accumulated across categories
//! - `PipelineStats` - Per-category counters for logging
//!
//! Files are read in chunks of lines; each chunk is decoded, cleaned and
//! filtered in parallel, then merged back in file order. All metadata must
//! be loaded before the first review file is sampled, so every review is
//! checked against the complete index.

mod types;

pub use types::{CategoryStats, MetadataIndex, PipelineStats};

use crate::clean::{concat_item_metadata, concat_review};
use crate::config::SamplerConfig;
use crate::decode::JsonlChunks;
use crate::error::{Error, Result};
use crate::filter::{accept_metadata, Downsampler, ReviewFilter, ReviewVerdict};
use crate::output::RowSink;
use crate::types::{ItemMetadataRecord, OutputRow, ParentAsin, ReviewRecord};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::io::BufRead;
use std::time::Instant;
use tracing::{debug, info};

/// Record-processing pipeline
pub struct Pipeline {
    /// Worker pool for per-record work
    pool: ThreadPool,
    /// Accumulated item metadata
    index: MetadataIndex,
    /// Review acceptance predicate
    filter: ReviewFilter,
    /// Minimum metadata length (exclusive)
    min_meta_len: usize,
    /// Lines per parallel batch
    chunk_size: usize,
    /// Position of the next review across all files, for seeded sampling
    review_position: u64,
    /// Set once the first review file is sampled
    reviews_started: bool,
    /// Statistics
    stats: PipelineStats,
}

impl Pipeline {
    /// Create a pipeline from the run configuration
    pub fn new(config: &SamplerConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("sampler-worker-{i}"))
            .build()
            .map_err(|e| Error::WorkerPool {
                message: e.to_string(),
            })?;

        let sampling = &config.sampling;
        let downsampler = match sampling.seed {
            Some(seed) => Downsampler::seeded(sampling.downsampling_factor, seed),
            None => Downsampler::new(sampling.downsampling_factor),
        };

        Ok(Self {
            pool,
            index: MetadataIndex::new(),
            filter: ReviewFilter::new(downsampler, sampling.valid_timestamp, sampling.min_text_len),
            min_meta_len: sampling.min_text_len,
            chunk_size: config.chunk_size,
            review_position: 0,
            reviews_started: false,
            stats: PipelineStats::default(),
        })
    }

    /// Get the metadata index
    pub fn index(&self) -> &MetadataIndex {
        &self.index
    }

    /// Get statistics
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Index one category's item metadata, returning the number indexed
    pub fn load_metadata<R: BufRead>(&mut self, category: &str, reader: R) -> Result<usize> {
        if self.reviews_started {
            return Err(Error::Other(format!(
                "Cannot load metadata for '{category}' after review sampling has started"
            )));
        }

        let started = Instant::now();
        let min_len = self.min_meta_len;
        let mut counts = CategoryStats::new(category);

        for chunk in JsonlChunks::with_chunk_size(reader, self.chunk_size) {
            let lines = chunk?;
            counts.metadata_seen += lines.len();

            let cleaned: Vec<Option<(ParentAsin, String)>> = self.pool.install(|| {
                lines
                    .par_iter()
                    .map(|line| -> Result<Option<(ParentAsin, String)>> {
                        let record: ItemMetadataRecord = line.decode()?;
                        let text = concat_item_metadata(&record);
                        Ok(accept_metadata(&text, min_len).then_some((record.parent_asin, text)))
                    })
                    .collect::<Result<Vec<_>>>()
            })?;

            for (parent_asin, text) in cleaned.into_iter().flatten() {
                self.index.insert(parent_asin, text);
                counts.metadata_kept += 1;
            }
            debug!(
                "{}: {} metadata records processed",
                category, counts.metadata_seen
            );
        }

        info!(
            "{}: indexed {} of {} item metadata records ({} items total)",
            category,
            counts.metadata_kept,
            counts.metadata_seen,
            self.index.len()
        );

        let kept = counts.metadata_kept;
        self.stats.category_mut(category).merge(&counts);
        self.stats.elapsed_ms += started.elapsed().as_millis() as u64;
        Ok(kept)
    }

    /// Sample one category's reviews into `sink`, returning the rows written
    pub fn sample_reviews<R: BufRead>(
        &mut self,
        category: &str,
        reader: R,
        sink: &mut dyn RowSink,
    ) -> Result<usize> {
        self.reviews_started = true;

        let started = Instant::now();
        let mut counts = CategoryStats::new(category);

        for chunk in JsonlChunks::with_chunk_size(reader, self.chunk_size) {
            let lines = chunk?;
            let base = self.review_position;
            let filter = &self.filter;
            let index = &self.index;

            let evaluated: Vec<(ReviewVerdict, Option<OutputRow>)> = self.pool.install(|| {
                lines
                    .par_iter()
                    .enumerate()
                    .map(|(offset, line)| -> Result<(ReviewVerdict, Option<OutputRow>)> {
                        let record: ReviewRecord = line.decode()?;
                        let review = concat_review(&record);
                        let verdict = filter.evaluate(
                            base + offset as u64,
                            record.timestamp,
                            &record.parent_asin,
                            &review,
                            index,
                        );
                        let row = if verdict.is_keep() {
                            index.get(&record.parent_asin).map(|meta| OutputRow {
                                review,
                                meta: meta.to_string(),
                                parent_asin: record.parent_asin,
                            })
                        } else {
                            None
                        };
                        Ok((verdict, row))
                    })
                    .collect::<Result<Vec<_>>>()
            })?;
            self.review_position += lines.len() as u64;

            for (verdict, row) in evaluated {
                counts.record(verdict);
                if let Some(row) = row {
                    sink.write_row(&row)?;
                }
            }
            debug!("{}: {} reviews processed", category, counts.reviews_seen);
        }

        info!(
            "{}: kept {} of {} reviews (sampled out {}, too new {}, unknown item {}, too short {})",
            category,
            counts.reviews_kept,
            counts.reviews_seen,
            counts.sampled_out,
            counts.too_new,
            counts.unknown_item,
            counts.too_short
        );

        let kept = counts.reviews_kept;
        self.stats.category_mut(category).merge(&counts);
        self.stats.elapsed_ms += started.elapsed().as_millis() as u64;
        Ok(kept)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("workers", &self.pool.current_num_threads())
            .field("indexed_items", &self.index.len())
            .field("chunk_size", &self.chunk_size)
            .field("reviews_started", &self.reviews_started)
            .finish_non_exhaustive()
    }
}
