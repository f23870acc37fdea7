//! Configuration module for Kagami
//!
//! A crawl session is usually configured straight from the command line,
//! but a TOML file can stand in for the flags:
//!
//! ```toml
//! target = "https://xkcd.com"
//! out-dir = "files"
//! workers = 12
//! settle-ms = 100
//! ```
//!
//! Both `target` and `out-dir` have a single trailing slash stripped once
//! at construction, whichever path the values arrive through.

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default worker pool capacity
pub const DEFAULT_WORKERS: usize = 1;

/// Default settle delay after navigation, in milliseconds
pub const DEFAULT_SETTLE_MS: u64 = 100;

/// Configuration for one crawl session
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL; also the substring every in-scope URL must contain
    pub target: String,

    /// Root directory the mirrored tree is written under
    #[serde(rename = "out-dir")]
    pub out_dir: String,

    /// Number of concurrent browser pages
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Fixed wait after navigation before anchors are enumerated (ms)
    #[serde(rename = "settle-ms", default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_settle_ms() -> u64 {
    DEFAULT_SETTLE_MS
}

impl CrawlConfig {
    /// Creates a configuration with default worker count and settle delay.
    pub fn new(target: &str, out_dir: &str) -> Self {
        Self {
            target: strip_trailing_slash(target),
            out_dir: strip_trailing_slash(out_dir),
            workers: DEFAULT_WORKERS,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    /// The settle delay as a [`Duration`].
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Applies the once-at-construction normalization to fields that came
    /// in raw (the TOML path deserializes without going through `new`).
    fn normalized(mut self) -> Self {
        self.target = strip_trailing_slash(&self.target);
        self.out_dir = strip_trailing_slash(&self.out_dir);
        self
    }
}

/// Strips at most one trailing slash.
fn strip_trailing_slash(s: &str) -> String {
    s.strip_suffix('/').unwrap_or(s).to_string()
}

/// Loads, normalizes, and validates a configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate
pub fn load_config(path: &Path) -> ConfigResult<CrawlConfig> {
    let content = std::fs::read_to_string(path)?;

    let config: CrawlConfig = toml::from_str(&content)?;
    let config = config.normalized();

    validate(&config)?;

    Ok(config)
}

/// Validates a configuration
///
/// Checks that the worker count is positive, the output directory is
/// nonempty, and the target parses as an absolute http(s) URL.
pub fn validate(config: &CrawlConfig) -> ConfigResult<()> {
    if config.workers == 0 {
        return Err(ConfigError::Validation(
            "workers must be at least 1".to_string(),
        ));
    }

    if config.out_dir.is_empty() {
        return Err(ConfigError::Validation(
            "out-dir must not be empty".to_string(),
        ));
    }

    match Url::parse(&config.target) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        Ok(url) => Err(ConfigError::Validation(format!(
            "target has unsupported scheme '{}'",
            url.scheme()
        ))),
        Err(e) => Err(ConfigError::Validation(format!(
            "target is not an absolute URL: {}",
            e
        ))),
    }
}
