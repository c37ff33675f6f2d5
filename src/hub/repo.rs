//! Dataset repository client
//!
//! Resolves repository paths to download URLs and keeps a local copy of
//! every file it fetches.

use super::catalog::parse_manifest;
use crate::config::HubConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::output::partial_path;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Read-only view of a dataset repository on the hub
#[derive(Debug)]
pub struct DatasetRepo {
    client: HttpClient,
    config: HubConfig,
}

impl DatasetRepo {
    /// Create a repository client from hub settings
    pub fn new(config: HubConfig) -> Result<Self> {
        let mut http = HttpClientConfig::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .max_retries(config.max_retries);
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            http = http.bearer_token(token);
        }

        Ok(Self {
            client: HttpClient::with_config(http.build())?,
            config,
        })
    }

    /// Create a repository client around an existing HTTP client
    pub fn with_client(config: HubConfig, client: HttpClient) -> Self {
        Self { client, config }
    }

    /// Get the hub settings
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Download URL of a file in the repository
    pub fn file_url(&self, path: &str) -> Result<Url> {
        let url = format!(
            "{}/datasets/{}/resolve/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.repo_id,
            self.config.revision,
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&url)?)
    }

    /// Local path a repository file is cached at
    pub fn cache_path(&self, path: &str) -> PathBuf {
        let mut local = self
            .config
            .cache_dir
            .join(&self.config.repo_id)
            .join(&self.config.revision);
        for segment in path.split('/').filter(|s| !s.is_empty() && *s != "..") {
            local.push(segment);
        }
        local
    }

    /// Fetch a file, reusing the cached copy when present
    pub async fn fetch(&self, path: &str) -> Result<PathBuf> {
        let local = self.cache_path(path);
        if tokio::fs::try_exists(&local).await? {
            debug!("Using cached {}", local.display());
            return Ok(local);
        }

        if let Some(parent) = local.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let url = self.file_url(path)?;
        let partial = partial_path(&local);
        info!("Downloading {}", url);
        let started = Instant::now();

        let request =
            RequestConfig::new().timeout(Duration::from_secs(self.config.download_timeout_secs));
        let written = match self
            .client
            .download_to(url.as_str(), &partial, request)
            .await
        {
            Ok(written) => written,
            Err(e) => {
                // Best effort: a leftover partial file is overwritten next time anyway
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, &local).await?;

        info!(
            "Downloaded {} ({:.1} MiB in {:.1}s)",
            path,
            written as f64 / (1024.0 * 1024.0),
            started.elapsed().as_secs_f64()
        );
        Ok(local)
    }

    /// Fetch several files with bounded concurrency, preserving order
    pub async fn fetch_all(&self, paths: &[String]) -> Result<Vec<PathBuf>> {
        let limit = self.config.concurrent_downloads.max(1);
        stream::iter(paths)
            .map(|path| self.fetch(path))
            .buffered(limit)
            .try_collect()
            .await
    }

    /// Fetch and parse the category manifest
    pub async fn fetch_categories(&self) -> Result<Vec<String>> {
        let local = self.fetch(&self.config.manifest_path).await?;
        let content = tokio::fs::read_to_string(&local).await?;
        let categories = parse_manifest(&content);
        if categories.is_empty() {
            warn!("Category manifest {} lists no categories", self.config.manifest_path);
        }
        debug!("Manifest lists {} categories", categories.len());
        Ok(categories)
    }
}

