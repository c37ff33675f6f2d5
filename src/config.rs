//! Configuration types for a sampling run
//!
//! Every field has a default matching the published dataset layout, so a
//! run needs no config file. A YAML file can override any subset of
//! fields, and CLI flags override the file.

use crate::error::{Error, Result};
use crate::filter::{DOWNSAMPLING_FACTOR, MIN_TEXT_LEN, VALID_TIMESTAMP};
use crate::types::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the category name in path templates
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration for a sampling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Dataset repository settings
    pub hub: HubConfig,

    /// Filtering and downsampling settings
    pub sampling: SamplingConfig,

    /// Size of the record-processing worker pool
    pub workers: usize,

    /// Lines decoded and processed per parallel batch
    pub chunk_size: usize,

    /// Output destination
    pub output: OutputConfig,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            hub: HubConfig::default(),
            sampling: SamplingConfig::default(),
            workers: 16,
            chunk_size: 65_536,
            output: OutputConfig::default(),
        }
    }
}

impl SamplerConfig {
    /// Parse a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Check value ranges and template shape
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::invalid_value("workers", "must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(Error::invalid_value("chunk_size", "must be at least 1"));
        }
        if self.sampling.downsampling_factor == 0 {
            return Err(Error::invalid_value(
                "sampling.downsampling_factor",
                "must be at least 1",
            ));
        }
        if !self.hub.meta_path_template.contains(CATEGORY_PLACEHOLDER) {
            return Err(Error::invalid_value(
                "hub.meta_path_template",
                format!("must contain {CATEGORY_PLACEHOLDER}"),
            ));
        }
        if !self.hub.review_path_template.contains(CATEGORY_PLACEHOLDER) {
            return Err(Error::invalid_value(
                "hub.review_path_template",
                format!("must contain {CATEGORY_PLACEHOLDER}"),
            ));
        }
        if self.hub.repo_id.split('/').count() != 2 {
            return Err(Error::invalid_value(
                "hub.repo_id",
                format!("expected '<owner>/<name>', got '{}'", self.hub.repo_id),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Hub Config
// ============================================================================

/// Where and how dataset files are fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Hub base URL
    pub endpoint: String,

    /// Dataset repository id (`owner/name`)
    pub repo_id: String,

    /// Branch, tag or commit
    pub revision: String,

    /// Path of the category manifest inside the repository
    pub manifest_path: String,

    /// Path template of a category's item metadata file
    pub meta_path_template: String,

    /// Path template of a category's review file
    pub review_path_template: String,

    /// Local directory for downloaded files
    pub cache_dir: PathBuf,

    /// Bearer token for gated or private repositories
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Timeout for small requests, in seconds
    pub timeout_secs: u64,

    /// Timeout for a whole partition download, in seconds
    pub download_timeout_secs: u64,

    /// Retries for failed requests
    pub max_retries: u32,

    /// Partition downloads in flight at once
    pub concurrent_downloads: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://huggingface.co".to_string(),
            repo_id: "McAuley-Lab/Amazon-Reviews-2023".to_string(),
            revision: "main".to_string(),
            manifest_path: "all_categories.txt".to_string(),
            meta_path_template: "raw/meta_categories/meta_{category}.jsonl".to_string(),
            review_path_template: "raw/review_categories/{category}.jsonl".to_string(),
            cache_dir: PathBuf::from(".hf-cache"),
            token: None,
            timeout_secs: 30,
            download_timeout_secs: 6 * 60 * 60,
            max_retries: 3,
            concurrent_downloads: 4,
        }
    }
}

impl HubConfig {
    /// Metadata file path for a category
    pub fn meta_path(&self, category: &str) -> String {
        self.meta_path_template
            .replace(CATEGORY_PLACEHOLDER, category)
    }

    /// Review file path for a category
    pub fn review_path(&self, category: &str) -> String {
        self.review_path_template
            .replace(CATEGORY_PLACEHOLDER, category)
    }
}

// ============================================================================
// Sampling Config
// ============================================================================

/// Filter thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Keep one review in this many
    pub downsampling_factor: u32,

    /// Exclusive upper bound on review timestamps (epoch milliseconds)
    pub valid_timestamp: i64,

    /// Cleaned text must be longer than this many characters
    pub min_text_len: usize,

    /// Seed for reproducible downsampling
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            downsampling_factor: DOWNSAMPLING_FACTOR,
            valid_timestamp: VALID_TIMESTAMP,
            min_text_len: MIN_TEXT_LEN,
            seed: None,
        }
    }
}

// ============================================================================
// Output Config
// ============================================================================

/// Output file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file path
    pub path: PathBuf,

    /// Output format
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("clean_review_meta.tsv"),
            format: OutputFormat::Tsv,
        }
    }
}
