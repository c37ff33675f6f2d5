//! Tab-separated output
//!
//! Header row, `\n` line terminator, no index column. A field is quoted
//! only when it contains a tab, a double quote or a line break, with inner
//! quotes doubled.

use super::RowSink;
use crate::error::{Error, Result};
use crate::types::{OutputRow, OUTPUT_COLUMNS};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Tab-separated row writer
pub struct TsvWriter<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl TsvWriter<BufWriter<File>> {
    /// Create or truncate a TSV file
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            Error::output(format!("Failed to create '{}': {e}", path.display()))
        })?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> TsvWriter<W> {
    /// Wrap a writer and emit the header row
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(Terminator::Any(b'\n'))
            .quote_style(QuoteStyle::Necessary)
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(OUTPUT_COLUMNS)?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Flush and return the inner writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::output(format!("Failed to flush TSV output: {}", e.error())))
    }
}

impl<W: Write + Send> RowSink for TsvWriter<W> {
    fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.writer.serialize(row)?;
        self.rows_written += 1;
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn finish(mut self: Box<Self>) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}
