//! Engine types
//!
//! The metadata index and run statistics.

use crate::filter::ReviewVerdict;
use crate::types::ParentAsin;
use serde::Serialize;
use std::collections::HashMap;

/// `parent_asin` to cleaned metadata text, accumulated across categories
///
/// A later insert for the same item replaces the earlier text.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    entries: HashMap<ParentAsin, String>,
}

impl MetadataIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item's metadata
    pub fn insert(&mut self, parent_asin: ParentAsin, cleaned_metadata: String) {
        self.entries.insert(parent_asin, cleaned_metadata);
    }

    /// Look up an item's metadata
    pub fn get(&self, parent_asin: &str) -> Option<&str> {
        self.entries.get(parent_asin).map(String::as_str)
    }

    /// Check if an item is indexed
    pub fn contains(&self, parent_asin: &str) -> bool {
        self.entries.contains_key(parent_asin)
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-category counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Category name
    pub category: String,
    /// Metadata records read
    pub metadata_seen: usize,
    /// Metadata records indexed
    pub metadata_kept: usize,
    /// Review records read
    pub reviews_seen: usize,
    /// Reviews that lost the downsampling draw
    pub sampled_out: usize,
    /// Reviews at or after the timestamp cutoff
    pub too_new: usize,
    /// Reviews of items missing from the index
    pub unknown_item: usize,
    /// Reviews too short after cleaning
    pub too_short: usize,
    /// Reviews written to the output
    pub reviews_kept: usize,
}

impl CategoryStats {
    /// Create zeroed counters for a category
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// Count one review verdict
    pub fn record(&mut self, verdict: ReviewVerdict) {
        self.reviews_seen += 1;
        match verdict {
            ReviewVerdict::Keep => self.reviews_kept += 1,
            ReviewVerdict::SampledOut => self.sampled_out += 1,
            ReviewVerdict::TooNew => self.too_new += 1,
            ReviewVerdict::UnknownItem => self.unknown_item += 1,
            ReviewVerdict::TooShort => self.too_short += 1,
        }
    }

    /// Add another set of counters into this one
    pub fn merge(&mut self, other: &CategoryStats) {
        self.metadata_seen += other.metadata_seen;
        self.metadata_kept += other.metadata_kept;
        self.reviews_seen += other.reviews_seen;
        self.sampled_out += other.sampled_out;
        self.too_new += other.too_new;
        self.unknown_item += other.unknown_item;
        self.too_short += other.too_short;
        self.reviews_kept += other.reviews_kept;
    }
}

/// Statistics for a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    /// Counters per category, in processing order
    pub categories: Vec<CategoryStats>,
    /// Wall-clock time spent processing records
    pub elapsed_ms: u64,
}

impl PipelineStats {
    /// Counters for a category, created on first use
    pub fn category_mut(&mut self, category: &str) -> &mut CategoryStats {
        let position = match self.categories.iter().position(|c| c.category == category) {
            Some(position) => position,
            None => {
                self.categories.push(CategoryStats::new(category));
                self.categories.len() - 1
            }
        };
        &mut self.categories[position]
    }

    /// Counters for a category, if it has been processed
    pub fn category(&self, category: &str) -> Option<&CategoryStats> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Sum over all categories
    pub fn totals(&self) -> CategoryStats {
        let mut totals = CategoryStats::new("total");
        for stats in &self.categories {
            totals.merge(stats);
        }
        totals
    }
}
