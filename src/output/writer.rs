//! Parquet row writer
//!
//! Buffers rows into Arrow RecordBatches of three UTF-8 columns and writes
//! them to a Parquet file.

use super::RowSink;
use crate::error::{Error, Result};
use crate::types::{OutputRow, OUTPUT_COLUMNS};
use arrow::array::{ArrayRef, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Configuration for the Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    batch_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024,
            batch_size: 8192,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Set rows buffered per RecordBatch
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Get rows buffered per RecordBatch
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Arrow schema of the output rows
pub fn output_schema() -> SchemaRef {
    Arc::new(Schema::new(
        OUTPUT_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ))
}

/// Parquet row writer
pub struct ParquetRowWriter {
    writer: ArrowWriter<File>,
    schema: SchemaRef,
    batch_size: usize,
    review: StringBuilder,
    meta: StringBuilder,
    parent_asin: StringBuilder,
    buffered: usize,
    rows_written: usize,
}

impl ParquetRowWriter {
    /// Create or truncate a Parquet file
    pub fn create(path: impl AsRef<Path>, config: &ParquetWriterConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            Error::output(format!("Failed to create '{}': {e}", path.display()))
        })?;

        let schema = output_schema();
        let writer = ArrowWriter::try_new(file, schema.clone(), Some(config.build_properties()))
            .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;

        Ok(Self {
            writer,
            schema,
            batch_size: config.batch_size,
            review: StringBuilder::new(),
            meta: StringBuilder::new(),
            parent_asin: StringBuilder::new(),
            buffered: 0,
            rows_written: 0,
        })
    }

    fn flush_batch(&mut self) -> Result<()> {
        if self.buffered == 0 {
            return Ok(());
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(self.review.finish()),
            Arc::new(self.meta.finish()),
            Arc::new(self.parent_asin.finish()),
        ];
        let batch = RecordBatch::try_new(self.schema.clone(), columns)?;
        self.writer
            .write(&batch)
            .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;
        self.buffered = 0;
        Ok(())
    }
}

impl RowSink for ParquetRowWriter {
    fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.review.append_value(&row.review);
        self.meta.append_value(&row.meta);
        self.parent_asin.append_value(&row.parent_asin);
        self.buffered += 1;
        self.rows_written += 1;

        if self.buffered >= self.batch_size {
            self.flush_batch()?;
        }
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn finish(mut self: Box<Self>) -> Result<usize> {
        self.flush_batch()?;
        let this = *self;
        let rows = this.rows_written;
        this.writer
            .close()
            .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;
        Ok(rows)
    }
}
