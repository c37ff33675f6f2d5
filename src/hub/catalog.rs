//! Category manifest parsing and selection

use crate::error::{Error, Result};

/// Parse the category manifest: one name per line, blank lines ignored
pub fn parse_manifest(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Pick the categories to process
///
/// With `all` set every category is returned, possibly none. Otherwise `requested` is
/// matched case-insensitively against the manifest and the manifest's
/// spelling is returned.
pub fn select_categories(available: &[String], requested: &str, all: bool) -> Result<Vec<String>> {
    if all {
        return Ok(available.to_vec());
    }

    let wanted = requested.to_lowercase();
    let matching: Vec<String> = available
        .iter()
        .filter(|category| category.to_lowercase() == wanted)
        .cloned()
        .collect();

    if matching.is_empty() {
        return Err(Error::category_not_found(requested, available.to_vec()));
    }
    Ok(matching)
}
