//! Chunked JSON Lines reader

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::io::BufRead;

/// Lines per chunk when no size is configured
pub const DEFAULT_CHUNK_SIZE: usize = 65_536;

/// One non-blank line of a JSON Lines file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonlLine {
    /// 1-based line number in the source file
    pub number: usize,
    /// Line content without the terminator
    pub text: String,
}

impl JsonlLine {
    /// Parse the line into a record
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.text).map_err(|e| Error::decode(self.number, e.to_string()))
    }
}

/// Iterator over chunks of non-blank lines
///
/// Yields `Vec`s of at most `chunk_size` lines; the last chunk may be
/// shorter. Blank lines are skipped but still counted for line numbers.
#[derive(Debug)]
pub struct JsonlChunks<R> {
    reader: R,
    chunk_size: usize,
    line_number: usize,
    buf: String,
    finished: bool,
}

impl<R: BufRead> JsonlChunks<R> {
    /// Create a reader with the default chunk size
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Create a reader with a custom chunk size
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
            line_number: 0,
            buf: String::new(),
            finished: false,
        }
    }

    /// Lines consumed so far, blank ones included
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    fn next_chunk(&mut self) -> Result<Vec<JsonlLine>> {
        let mut chunk = Vec::with_capacity(self.chunk_size.min(DEFAULT_CHUNK_SIZE));

        while chunk.len() < self.chunk_size {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                self.finished = true;
                break;
            }
            self.line_number += 1;

            let text = self.buf.trim_end_matches(['\n', '\r']);
            if text.trim().is_empty() {
                continue;
            }
            chunk.push(JsonlLine {
                number: self.line_number,
                text: text.to_string(),
            });
        }

        Ok(chunk)
    }
}

impl<R: BufRead> Iterator for JsonlChunks<R> {
    type Item = Result<Vec<JsonlLine>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_chunk() {
            Ok(chunk) if chunk.is_empty() => None,
            Ok(chunk) => Some(Ok(chunk)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
