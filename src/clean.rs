//! Text cleaning
//!
//! Builds the single-line strings written to the output file from the
//! multi-field dataset records. Parts are concatenated in a fixed order
//! with one space between present parts, then control whitespace is
//! normalised.

use crate::types::{ItemMetadataRecord, ReviewRecord};

/// Join the non-empty parts with exactly one space between them
pub fn join_parts<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(part);
    }
    joined
}

/// Normalise a string to a single line
///
/// Tabs and newlines become spaces, carriage returns are dropped, and
/// surrounding whitespace is trimmed.
pub fn clean_text(text: &str) -> String {
    let normalised: String = text
        .chars()
        .filter_map(|c| match c {
            '\t' | '\n' => Some(' '),
            '\r' => None,
            other => Some(other),
        })
        .collect();
    normalised.trim().to_string()
}

/// Length in characters, the unit all length thresholds use
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Title, then features, then description
pub fn concat_item_metadata(record: &ItemMetadataRecord) -> String {
    let features = record.features.join(" ");
    let description = record.description.join(" ");
    clean_text(&join_parts([
        record.title.as_deref().unwrap_or_default(),
        features.as_str(),
        description.as_str(),
    ]))
}

/// Title, then body
pub fn concat_review(record: &ReviewRecord) -> String {
    clean_text(&join_parts([
        record.title.as_deref().unwrap_or_default(),
        record.text.as_deref().unwrap_or_default(),
    ]))
}
