//! Error types for s3du.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Boxed error returned by the S3 SDK.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for every stage of the listing and viewing pipeline.
#[derive(Debug, thiserror::Error)]
pub enum S3duError {
    /// A local file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A cache row could not be parsed.
    #[error("malformed cache row at {}:{line}: {message}", .path.display())]
    Parse {
        /// The cache file.
        path: PathBuf,
        /// 1-based line number of the offending row.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// The S3 listing API returned an error.
    #[error("failed to list {bucket}: {source}")]
    Listing {
        /// The bucket being listed, or `*` when enumerating buckets.
        bucket: String,
        /// The SDK error.
        #[source]
        source: BoxError,
    },

    /// The viewer binary could not be started.
    #[error("failed to launch viewer `{program}`: {source}")]
    ViewerLaunch {
        /// The program that was invoked.
        program: String,
        /// The spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The viewer ran but exited unsuccessfully.
    #[error("viewer `{program}` exited with {status}")]
    ViewerExit {
        /// The program that was invoked.
        program: String,
        /// Its exit status.
        status: ExitStatus,
    },

    /// The export could not be serialized.
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl S3duError {
    /// Wrap an I/O error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for s3du operations.
pub type S3duResult<T> = Result<T, S3duError>;
