//! Dataset hub module
//!
//! Access to a dataset repository hosted on the Hugging Face Hub.
//!
//! # Overview
//!
//! - `DatasetRepo` - resolves repository paths, downloads and caches files
//! - `parse_manifest` / `select_categories` - category manifest handling
//!
//! Files are addressed as `{endpoint}/datasets/{repo_id}/resolve/{revision}/{path}`
//! and cached under `{cache_dir}/{repo_id}/{revision}/{path}`.

mod catalog;
mod repo;

pub use catalog::{parse_manifest, select_categories};
pub use repo::DatasetRepo;

#[cfg(test)]
mod tests;
