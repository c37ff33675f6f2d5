//! Acceptance predicates for metadata and reviews
//!
//! Reviews pass through four checks in a fixed order: a uniform
//! downsampling draw, a timestamp cutoff, a lookup in the metadata index,
//! and a minimum length. The first failing check is reported as the
//! verdict so the pipeline can count rejections per reason.

use crate::clean::text_len;
use crate::engine::MetadataIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Denominator of the review keep probability
pub const DOWNSAMPLING_FACTOR: u32 = 10;

/// Reviews at or after this epoch-millisecond timestamp are dropped
pub const VALID_TIMESTAMP: i64 = 1_628_643_414_042;

/// Cleaned text must be strictly longer than this many characters
pub const MIN_TEXT_LEN: usize = 30;

/// Whether a cleaned metadata string is long enough to index
pub fn accept_metadata(cleaned: &str, min_len: usize) -> bool {
    text_len(cleaned) > min_len
}

// ============================================================================
// Downsampling
// ============================================================================

/// Uniform 1-in-`factor` draw per record
///
/// Unseeded draws use the thread-local RNG. A seeded downsampler derives
/// each draw from the seed and the record position, so the outcome does
/// not depend on which worker evaluates the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downsampler {
    factor: u32,
    seed: Option<u64>,
}

impl Downsampler {
    /// Create an unseeded downsampler
    pub fn new(factor: u32) -> Self {
        Self { factor, seed: None }
    }

    /// Create a reproducible downsampler
    pub fn seeded(factor: u32, seed: u64) -> Self {
        Self {
            factor,
            seed: Some(seed),
        }
    }

    /// Get the downsampling factor
    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Draw in `[1, factor]` and keep on 1
    pub fn keep(&self, position: u64) -> bool {
        if self.factor <= 1 {
            return true;
        }
        let draw = match self.seed {
            Some(seed) => {
                let stream = seed.wrapping_add(position.wrapping_mul(0x9E37_79B9_7F4A_7C15));
                StdRng::seed_from_u64(stream).gen_range(1..=self.factor)
            }
            None => rand::thread_rng().gen_range(1..=self.factor),
        };
        draw == 1
    }
}

impl Default for Downsampler {
    fn default() -> Self {
        Self::new(DOWNSAMPLING_FACTOR)
    }
}

// ============================================================================
// Review Verdicts
// ============================================================================

/// Outcome of evaluating one review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    /// All checks passed
    Keep,
    /// Lost the downsampling draw
    SampledOut,
    /// Timestamp at or after the cutoff
    TooNew,
    /// Item not present in the metadata index
    UnknownItem,
    /// Cleaned review not longer than the minimum
    TooShort,
}

impl ReviewVerdict {
    /// Check if the review survives
    pub fn is_keep(self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// Review acceptance predicate
#[derive(Debug, Clone, Copy)]
pub struct ReviewFilter {
    downsampler: Downsampler,
    valid_timestamp: i64,
    min_text_len: usize,
}

impl ReviewFilter {
    /// Create a filter
    pub fn new(downsampler: Downsampler, valid_timestamp: i64, min_text_len: usize) -> Self {
        Self {
            downsampler,
            valid_timestamp,
            min_text_len,
        }
    }

    /// Get the downsampler
    pub fn downsampler(&self) -> &Downsampler {
        &self.downsampler
    }

    /// Evaluate a cleaned review against the metadata index
    ///
    /// `position` identifies the record for seeded downsampling.
    pub fn evaluate(
        &self,
        position: u64,
        timestamp: i64,
        parent_asin: &str,
        cleaned_review: &str,
        index: &MetadataIndex,
    ) -> ReviewVerdict {
        if !self.downsampler.keep(position) {
            return ReviewVerdict::SampledOut;
        }
        if timestamp >= self.valid_timestamp {
            return ReviewVerdict::TooNew;
        }
        if !index.contains(parent_asin) {
            return ReviewVerdict::UnknownItem;
        }
        if text_len(cleaned_review) <= self.min_text_len {
            return ReviewVerdict::TooShort;
        }
        ReviewVerdict::Keep
    }
}

impl Default for ReviewFilter {
    fn default() -> Self {
        Self::new(Downsampler::default(), VALID_TIMESTAMP, MIN_TEXT_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_REVIEW: &str = "This controller works perfectly with every game I own.";

    fn index_with(asin: &str) -> MetadataIndex {
        let mut index = MetadataIndex::new();
        index.insert(asin.to_string(), "x".repeat(40));
        index
    }

    fn keep_all() -> ReviewFilter {
        ReviewFilter::new(Downsampler::new(1), VALID_TIMESTAMP, MIN_TEXT_LEN)
    }

    #[test]
    fn test_accept_metadata_threshold() {
        assert!(!accept_metadata(&"a".repeat(30), MIN_TEXT_LEN));
        assert!(accept_metadata(&"a".repeat(31), MIN_TEXT_LEN));
        assert!(!accept_metadata("", MIN_TEXT_LEN));
    }

    #[test]
    fn test_factor_one_keeps_everything() {
        let sampler = Downsampler::new(1);
        assert!((0..1000).all(|i| sampler.keep(i)));
    }

    #[test]
    fn test_seeded_downsampler_is_reproducible() {
        let a = Downsampler::seeded(10, 42);
        let b = Downsampler::seeded(10, 42);
        let first: Vec<bool> = (0..500).map(|i| a.keep(i)).collect();
        let second: Vec<bool> = (0..500).rev().map(|i| b.keep(i)).rev().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_downsampler_keep_rate() {
        let sampler = Downsampler::seeded(10, 7);
        let kept = (0..20_000).filter(|&i| sampler.keep(i)).count();
        // 1-in-10 over 20k draws; bounds are many standard deviations wide
        assert!((1_500..2_500).contains(&kept), "kept {kept}");

        let unseeded = Downsampler::new(10);
        let kept = (0..20_000).filter(|&i| unseeded.keep(i)).count();
        assert!((1_500..2_500).contains(&kept), "kept {kept}");
    }

    #[test]
    fn test_review_keep() {
        let index = index_with("B01");
        let verdict = keep_all().evaluate(0, 1_500_000_000_000, "B01", LONG_REVIEW, &index);
        assert_eq!(verdict, ReviewVerdict::Keep);
        assert!(verdict.is_keep());
    }

    #[test]
    fn test_review_too_new_at_cutoff() {
        let index = index_with("B01");
        let filter = keep_all();
        assert_eq!(
            filter.evaluate(0, VALID_TIMESTAMP, "B01", LONG_REVIEW, &index),
            ReviewVerdict::TooNew
        );
        assert_eq!(
            filter.evaluate(0, VALID_TIMESTAMP - 1, "B01", LONG_REVIEW, &index),
            ReviewVerdict::Keep
        );
    }

    #[test]
    fn test_review_unknown_item() {
        let index = index_with("B01");
        assert_eq!(
            keep_all().evaluate(0, 0, "B99", LONG_REVIEW, &index),
            ReviewVerdict::UnknownItem
        );
    }

    #[test]
    fn test_review_too_short() {
        let index = index_with("B01");
        let filter = keep_all();
        assert_eq!(
            filter.evaluate(0, 0, "B01", &"r".repeat(30), &index),
            ReviewVerdict::TooShort
        );
        assert_eq!(
            filter.evaluate(0, 0, "B01", &"r".repeat(31), &index),
            ReviewVerdict::Keep
        );
    }

    #[test]
    fn test_checks_run_in_order() {
        let index = MetadataIndex::new();
        // Fails timestamp, lookup and length; timestamp is reported first
        assert_eq!(
            keep_all().evaluate(0, i64::MAX, "missing", "short", &index),
            ReviewVerdict::TooNew
        );
        // Fails lookup and length; lookup is reported first
        assert_eq!(
            keep_all().evaluate(0, 0, "missing", "short", &index),
            ReviewVerdict::UnknownItem
        );
    }

    #[test]
    fn test_defaults() {
        let filter = ReviewFilter::default();
        assert_eq!(filter.downsampler().factor(), DOWNSAMPLING_FACTOR);
    }
}
