//! JSON Lines decoding
//!
//! # Overview
//!
//! Dataset partitions are JSON Lines files, one record per line, often
//! several gigabytes each. The decoder reads them in fixed-size chunks of
//! raw lines so a chunk can be parsed and processed in parallel while the
//! rest of the file stays on disk.

mod decoders;

pub use decoders::{JsonlChunks, JsonlLine, DEFAULT_CHUNK_SIZE};
