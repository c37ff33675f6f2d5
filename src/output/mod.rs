//! Output module
//!
//! Writes `(review, meta, parent_asin)` rows to disk.
//!
//! # Overview
//!
//! This module provides:
//! - `RowSink` - the row consumer the pipeline writes into
//! - `TsvWriter` - tab-separated file with a header row (default)
//! - `ParquetRowWriter` - Parquet file with three UTF-8 columns

mod tsv;
mod writer;

pub use tsv::TsvWriter;
pub use writer::{output_schema, ParquetRowWriter, ParquetWriterConfig};

use crate::config::OutputConfig;
use crate::error::{Error, Result};
use crate::types::{OutputFormat, OutputRow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Destination for output rows
pub trait RowSink: Send {
    /// Append one row
    fn write_row(&mut self, row: &OutputRow) -> Result<()>;

    /// Rows appended so far
    fn rows_written(&self) -> usize;

    /// Flush and close, returning the total row count
    fn finish(self: Box<Self>) -> Result<usize>;
}

/// Path a file is written to before it is renamed into place
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// Open the configured output, creating parent directories as needed
///
/// Rows go to `<path>.part`, which only replaces `path` once the sink is
/// finished. A sink dropped before `finish` removes its partial file and
/// leaves any existing output untouched.
pub fn create_sink(config: &OutputConfig) -> Result<Box<dyn RowSink>> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let staging = partial_path(&config.path);
    debug!(
        "Writing {:?} output to {}",
        config.format,
        staging.display()
    );

    let inner: Box<dyn RowSink> = match config.format {
        OutputFormat::Tsv => Box::new(TsvWriter::create(&staging)?),
        OutputFormat::Parquet => Box::new(ParquetRowWriter::create(
            &staging,
            &ParquetWriterConfig::default(),
        )?),
    };

    Ok(Box::new(StagedSink {
        inner: Some(inner),
        staging,
        target: config.path.clone(),
    }))
}

/// Writes through to a partial file and renames it into place on finish
struct StagedSink {
    inner: Option<Box<dyn RowSink>>,
    staging: PathBuf,
    target: PathBuf,
}

impl StagedSink {
    fn discard(&mut self) {
        // Close the writer before unlinking its file
        drop(self.inner.take());
        if let Err(e) = fs::remove_file(&self.staging) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {e}", self.staging.display());
            }
        }
    }
}

impl RowSink for StagedSink {
    fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.write_row(row),
            None => Err(Error::output("Output already closed")),
        }
    }

    fn rows_written(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.rows_written())
    }

    fn finish(mut self: Box<Self>) -> Result<usize> {
        let inner = self
            .inner
            .take()
            .ok_or_else(|| Error::output("Output already closed"))?;

        let rows = match inner.finish() {
            Ok(rows) => rows,
            Err(e) => {
                self.discard();
                return Err(e);
            }
        };
        if let Err(e) = fs::rename(&self.staging, &self.target) {
            self.discard();
            return Err(Error::output(format!(
                "Failed to move output to '{}': {e}",
                self.target.display()
            )));
        }
        debug!("Wrote {} rows to {}", rows, self.target.display());
        Ok(rows)
    }
}

impl Drop for StagedSink {
    fn drop(&mut self) {
        if self.inner.is_some() {
            self.discard();
        }
    }
}

#[cfg(test)]
mod tests;
