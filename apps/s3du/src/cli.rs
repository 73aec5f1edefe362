//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use s3du_core::StorageClass;

/// s3du - ncdu for S3.
#[derive(Parser, Debug)]
#[command(name = "s3du", version)]
#[command(about = "Inspect S3 bucket usage interactively with ncdu")]
pub struct Args {
    /// Target just this bucket, rather than all available.
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Limit search under this prefix.
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Interactive, run ncdu.
    #[arg(short, long)]
    pub interactive: bool,

    /// Verbose mode: report listing progress.
    #[arg(short, long)]
    pub verbose: bool,

    /// Show only this storage class.
    #[arg(short = 'c', long, value_enum)]
    pub storage_class: Option<ClassArg>,

    /// Don't leverage the cache file.
    #[arg(short, long)]
    pub no_cache: bool,

    /// Output filename. The file is kept after the viewer exits.
    #[arg(short, long)]
    pub filename: Option<PathBuf>,
}

/// Storage classes accepted by `--storage-class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassArg {
    #[value(name = "STANDARD")]
    Standard,
    #[value(name = "STANDARD_IA")]
    StandardIa,
    #[value(name = "GLACIER")]
    Glacier,
    #[value(name = "DEEP_ARCHIVE")]
    DeepArchive,
}

impl From<ClassArg> for StorageClass {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::Standard => Self::Standard,
            ClassArg::StandardIa => Self::StandardIa,
            ClassArg::Glacier => Self::Glacier,
            ClassArg::DeepArchive => Self::DeepArchive,
        }
    }
}
