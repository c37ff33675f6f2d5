//! CLI arguments and configuration overrides

use crate::config::SamplerConfig;
use crate::error::Result;
use crate::types::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Sample review/metadata pairs from the Amazon Reviews 2023 dataset
#[derive(Parser, Debug)]
#[command(name = "review-meta-sampler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Category to process (matched case-insensitively)
    #[arg(long, default_value = "Video_Games")]
    pub category: String,

    /// Process all categories instead of just the selected one
    #[arg(long)]
    pub all_categories: bool,

    /// Configuration file (YAML)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Worker threads for record processing
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Directory for downloaded dataset files
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Seed for reproducible downsampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hub base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Hub access token
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the run configuration: defaults, then the config file, then flags
    pub fn resolve_config(&self) -> Result<SamplerConfig> {
        let mut config = match &self.config {
            Some(path) => SamplerConfig::load(path)?,
            None => SamplerConfig::default(),
        };

        if let Some(format) = self.format {
            config.output.format = format;
            if self.output.is_none() && format == OutputFormat::Parquet {
                config.output.path.set_extension("parquet");
            }
        }
        if let Some(output) = &self.output {
            config.output.path.clone_from(output);
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.hub.cache_dir.clone_from(cache_dir);
        }
        if let Some(seed) = self.seed {
            config.sampling.seed = Some(seed);
        }
        if let Some(endpoint) = &self.endpoint {
            config.hub.endpoint.clone_from(endpoint);
        }
        if let Some(token) = &self.token {
            config.hub.token = Some(token.clone());
        }

        config.validate()?;
        Ok(config)
    }
}
