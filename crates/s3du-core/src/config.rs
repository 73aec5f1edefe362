//! s3du configuration.
//!
//! Provides [`S3duConfig`]. Values are loaded from environment variables via
//! [`S3duConfig::from_env`]; command-line flags are layered on top by the
//! binary.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// File name of the listing cache inside the user's cache directory.
pub const CACHE_FILE_NAME: &str = "s3du-cache.csv";

/// Default freshness window of the listing cache, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default number of keys requested per listing call.
pub const DEFAULT_PAGE_SIZE: i32 = 1000;

/// s3du configuration.
///
/// # Examples
///
/// ```
/// use s3du_core::config::S3duConfig;
///
/// let config = S3duConfig::default();
/// assert_eq!(config.cache_ttl_secs, 3600);
/// assert_eq!(config.viewer, "ncdu");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct S3duConfig {
    /// Location of the listing cache.
    #[builder(default = default_cache_file())]
    pub cache_file: PathBuf,

    /// How long (in seconds) a cache file stays fresh after its last write.
    #[builder(default = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,

    /// The interactive viewer program, invoked as `<viewer> -f <file>`.
    #[builder(default = String::from("ncdu"))]
    pub viewer: String,

    /// `MaxKeys` sent with each `ListObjectsV2` call.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub page_size: i32,

    /// Custom S3 endpoint, e.g. a local S3 emulator.
    #[builder(default)]
    pub endpoint_url: Option<String>,

    /// Whether to use path-style bucket addressing.
    #[builder(default = false)]
    pub force_path_style: bool,

    /// Log level filter string (e.g. `"warn"`, `"debug"`).
    #[builder(default = String::from("warn"))]
    pub log_level: String,
}

impl Default for S3duConfig {
    fn default() -> Self {
        Self {
            cache_file: default_cache_file(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            viewer: String::from("ncdu"),
            page_size: DEFAULT_PAGE_SIZE,
            endpoint_url: None,
            force_path_style: false,
            log_level: String::from("warn"),
        }
    }
}

impl S3duConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `S3DU_CACHE_FILE` | `~/.cache/s3du-cache.csv` |
    /// | `S3DU_CACHE_TTL` | `3600` |
    /// | `S3DU_VIEWER` | `ncdu` |
    /// | `S3DU_PAGE_SIZE` | `1000` |
    /// | `S3DU_ENDPOINT_URL` | *(unset)* |
    /// | `S3DU_FORCE_PATH_STYLE` | `false` |
    /// | `LOG_LEVEL` | `warn` |
    ///
    /// Unparseable numeric values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("S3DU_CACHE_FILE") {
            config.cache_file = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("S3DU_CACHE_TTL") {
            if let Ok(n) = v.parse::<u64>() {
                config.cache_ttl_secs = n;
            }
        }
        if let Ok(v) = std::env::var("S3DU_VIEWER") {
            config.viewer = v;
        }
        if let Ok(v) = std::env::var("S3DU_PAGE_SIZE") {
            if let Ok(n) = v.parse::<i32>() {
                if n > 0 {
                    config.page_size = n;
                }
            }
        }
        if let Ok(v) = std::env::var("S3DU_ENDPOINT_URL") {
            if !v.is_empty() {
                config.endpoint_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("S3DU_FORCE_PATH_STYLE") {
            config.force_path_style = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The cache freshness window.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// `~/.cache/s3du-cache.csv`, or a file in the temp directory when no home
/// directory can be resolved.
#[must_use]
pub fn default_cache_file() -> PathBuf {
    dirs::home_dir()
        .map_or_else(std::env::temp_dir, |home| home.join(".cache"))
        .join(CACHE_FILE_NAME)
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
