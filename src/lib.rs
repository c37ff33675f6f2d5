// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]

//! # Review/Metadata Sampler
//!
//! Builds a pretraining corpus of `(review, item metadata)` pairs from the
//! Amazon Reviews 2023 dataset hosted on the Hugging Face hub.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────────┐   ┌──────────────────────┐   ┌───────────┐
//! │ Hub manifest │──▶│ meta_{category}     │──▶│ {category} reviews   │──▶│ TSV /     │
//! │ + downloads  │   │ clean, filter, index│   │ sample, filter, join │   │ Parquet   │
//! └──────────────┘   └─────────────────────┘   └──────────────────────┘   └───────────┘
//! ```
//!
//! Every selected category's metadata is indexed before any review is
//! sampled, so a review may pair with an item listed under another category.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use review_meta_sampler::cli::{Cli, Runner};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> review_meta_sampler::Result<()> {
//!     let cli = Cli::parse_from(["review-meta-sampler", "--category", "All_Beauty"]);
//!     let summary = Runner::new(cli).run().await?;
//!     println!("{} rows", summary.rows_written);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Record types and type aliases
pub mod types;

/// Run configuration
pub mod config;

/// Text cleaning and concatenation
pub mod clean;

/// Record acceptance rules and downsampling
pub mod filter;

/// HTTP client with retry and rate limiting
pub mod http;

/// JSON Lines reading
pub mod decode;

/// Dataset repository access
pub mod hub;

/// Sampling pipeline
pub mod engine;

/// TSV/Parquet output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::SamplerConfig;
pub use engine::{MetadataIndex, Pipeline, PipelineStats};
pub use hub::DatasetRepo;
pub use output::{create_sink, RowSink};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
