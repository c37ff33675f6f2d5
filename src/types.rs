//! Common types used throughout the sampler
//!
//! Dataset record shapes, output rows, and small shared enums.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// Product identifier linking reviews to item metadata
pub type ParentAsin = String;

// ============================================================================
// Dataset Records
// ============================================================================

/// One line of a `meta_<category>.jsonl` partition
///
/// Only the fields the pipeline reads are declared; everything else in the
/// line is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemMetadataRecord {
    /// Product identifier
    pub parent_asin: ParentAsin,

    /// Product title
    #[serde(default)]
    pub title: Option<String>,

    /// Bullet-point features
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<String>,

    /// Description paragraphs
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: Vec<String>,
}

/// One line of a `<category>.jsonl` review partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReviewRecord {
    /// Product identifier of the reviewed item
    pub parent_asin: ParentAsin,

    /// Review headline
    #[serde(default)]
    pub title: Option<String>,

    /// Review body
    #[serde(default)]
    pub text: Option<String>,

    /// Review time in epoch milliseconds
    pub timestamp: i64,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Output
// ============================================================================

/// A surviving review paired with its item's metadata text
///
/// Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    /// Cleaned review text
    pub review: String,
    /// Cleaned metadata text of the reviewed item
    pub meta: String,
    /// Product identifier
    pub parent_asin: ParentAsin,
}

/// Column names, in output order
pub const OUTPUT_COLUMNS: [&str; 3] = ["review", "meta", "parent_asin"];

/// Output file format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated values with a header row
    #[default]
    Tsv,
    /// Parquet file with three UTF-8 columns
    Parquet,
}

// ============================================================================
// HTTP Types
// ============================================================================

/// Backoff strategy for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
