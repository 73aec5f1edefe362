//! s3du - browse S3 storage usage with ncdu.
//!
//! Lists every object in one or all buckets, caches the listing for an
//! hour, folds it into a directory tree and opens the tree in `ncdu`.
//!
//! # Usage
//!
//! ```text
//! s3du [-b BUCKET] [-p PREFIX] [-c STORAGE_CLASS] [-n] [-f FILE] [-v]
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `S3DU_CACHE_FILE` | `~/.cache/s3du-cache.csv` | Listing cache |
//! | `S3DU_CACHE_TTL` | `3600` | Cache freshness window (seconds) |
//! | `S3DU_VIEWER` | `ncdu` | Viewer command |
//! | `S3DU_PAGE_SIZE` | `1000` | Keys per listing call |
//! | `S3DU_ENDPOINT_URL` | *(unset)* | Custom S3 endpoint |
//! | `S3DU_FORCE_PATH_STYLE` | `false` | Path-style addressing |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//!
//! AWS credentials and region come from the standard AWS provider chain.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use s3du_core::{
    BucketLister, CacheListing, CacheStore, DirectoryNode, NcduExport, S3ObjectSource, S3duConfig,
    StorageClass, Viewer,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, ClassArg};

/// Version reported in logs.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter directives for the given base level; verbose mode turns on debug
/// output for s3du's own crates.
fn filter_directives(log_level: &str, verbose: bool) -> String {
    if verbose {
        format!("{log_level},s3du=debug,s3du_core=debug")
    } else {
        log_level.to_owned()
    }
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Output goes to stderr so it never interleaves with stdout messages.
fn init_tracing(log_level: &str, verbose: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let directives = filter_directives(log_level, verbose);
        EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid log level filter: {directives}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// List S3 into the cache unless the cache is still fresh.
async fn refresh_cache(args: &Args, config: &S3duConfig, cache: &CacheStore) -> Result<()> {
    if cache.is_fresh(args.no_cache) {
        println!("Using file list from cache: {}", cache.path().display());
        return Ok(());
    }

    let source = S3ObjectSource::from_config(config).await;
    let lister = BucketLister::new(source)
        .with_bucket(args.bucket.clone())
        .with_prefix(args.prefix.as_deref());

    let mut writer = cache.writer()?;
    let count = lister
        .list_into(&mut writer)
        .await
        .context("failed to list objects")?;
    writer.commit()?;

    info!(count, path = %cache.path().display(), "cache refreshed");
    Ok(())
}

/// Read the cache and fold it into a tree.
fn load_tree(cache: &CacheStore, class: Option<ClassArg>) -> Result<(DirectoryNode, CacheListing)> {
    let filter = class.map(StorageClass::from);
    let listing = cache
        .read_all(filter.as_ref())
        .context("failed to read listing cache")?;
    let tree = DirectoryNode::from_records(&listing.records);

    info!(
        files = tree.file_count(),
        bytes = tree.total_size(),
        "directory tree built"
    );
    Ok((tree, listing))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = S3duConfig::from_env();

    init_tracing(&config.log_level, args.verbose)?;
    debug!(version = VERSION, interactive = args.interactive, ?config, "starting s3du");

    let cache = CacheStore::from_config(&config);
    refresh_cache(&args, &config, &cache).await?;

    let (tree, listing) = load_tree(&cache, args.storage_class)?;

    let viewer = Viewer::from_config(&config)?;
    viewer
        .show(&NcduExport::new(&tree), args.filename.as_deref())
        .await?;

    println!("Found objects of classes: {}.", listing.class_summary());
    Ok(())
}
