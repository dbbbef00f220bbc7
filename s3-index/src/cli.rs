//! Command-line surface for s3-index.
//!
//! Two modes: `publish` writes an index document into every folder plus the
//! static assets; `list` builds the same tree but only prints it. No flag
//! here changes core algorithmic behavior beyond root normalization and the
//! reserved-name set.

use clap::{Args, Parser, Subcommand};
use s3_index_core::config::IndexConfig;

use crate::store::StoreConfig;

/// CLI for s3-index: browsable static directory listings for an S3 prefix.
#[derive(Debug, Parser)]
#[clap(
    name = "s3-index",
    version,
    about = "Generate and publish browsable static HTML directory listings for an S3 bucket prefix"
)]
pub struct Cli {
    /// Logging level: error, warn, info, debug, trace
    #[clap(long, global = true, default_value = "info")]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Publish an index document per folder and the static assets
    Publish(RunArgs),
    /// Print the materialized listing only; nothing is written
    List(RunArgs),
}

/// Flags shared by both modes.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// S3 bucket name
    #[clap(long, short = 'b')]
    pub bucket: String,

    /// Key prefix that serves as the root directory (omit for the bucket top)
    #[clap(long, short = 'r', default_value = "")]
    pub root: String,

    /// AWS region
    #[clap(long)]
    pub region: Option<String>,

    /// Custom endpoint URL (e.g. LocalStack); switches to path-style access
    #[clap(long)]
    pub endpoint: Option<String>,

    /// AWS profile name
    #[clap(long)]
    pub profile: Option<String>,

    /// Explicit AWS access key; defaults to the SDK provider chain
    #[clap(long, requires = "secret_key")]
    pub access_key: Option<String>,

    /// Explicit AWS secret access key
    #[clap(long, requires = "access_key")]
    pub secret_key: Option<String>,

    /// Cache-Control max-age for the generated index documents, in seconds
    #[clap(long = "max-age-html", default_value_t = 2)]
    pub max_age_html: u64,

    /// Cache-Control max-age for static resource files (CSS, icons), in seconds
    #[clap(long = "max-age-resources", default_value_t = 9)]
    pub max_age_resources: u64,

    /// Filename of the generated index document
    #[clap(long, default_value = "index.html")]
    pub index_name: String,

    /// Page title for the generated indexes; defaults to "Index of <bucket>"
    #[clap(long)]
    pub title: Option<String>,

    /// Link base for stylesheet and icons; defaults to the site-absolute root
    #[clap(long)]
    pub asset_base: Option<String>,

    /// Show sizes in binary units (KiB) instead of SI units (kB)
    #[clap(long)]
    pub binary_units: bool,
}

impl RunArgs {
    /// Map the flags onto the core run configuration.
    pub fn index_config(&self) -> IndexConfig {
        let mut config = IndexConfig::new(&self.bucket, &self.root);
        config.index_filename = self.index_name.clone();
        config.index_max_age = self.max_age_html;
        config.resources_max_age = self.max_age_resources;
        config.decimal_units = !self.binary_units;
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(base) = &self.asset_base {
            config.asset_base = Some(base.clone());
        }
        config
    }

    /// Map the flags onto the store connection configuration.
    pub fn store_config(&self) -> StoreConfig {
        let mut store = StoreConfig::new();
        if let Some(region) = &self.region {
            store = store.with_region(region);
        }
        if let Some(endpoint) = &self.endpoint {
            store = store.with_endpoint(endpoint);
        }
        if let Some(profile) = &self.profile {
            store = store.with_profile(profile);
        }
        if let (Some(access_key), Some(secret_key)) = (&self.access_key, &self.secret_key) {
            store = store.with_credentials(access_key, secret_key);
        }
        store
    }
}
