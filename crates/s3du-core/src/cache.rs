//! Listing cache.
//!
//! The cache is a flat comma-delimited file with one `bucket,key,size,class`
//! row per object and no header. It is considered fresh for a fixed window
//! after its last write; within that window s3du skips the S3 listing
//! entirely.
//!
//! Writes go through a [`CacheWriter`], which streams rows into a temporary
//! file next to the cache and atomically replaces the cache on
//! [`CacheWriter::commit`]. An interrupted listing therefore never leaves a
//! truncated cache that looks fresh.

use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::config::S3duConfig;
use crate::error::{S3duError, S3duResult};
use crate::lister::RecordSink;
use crate::row::{self, Row, Rows};
use crate::types::{ObjectRecord, StorageClass};

/// Number of columns in a cache row.
const ROW_ARITY: usize = 4;

// ---------------------------------------------------------------------------
// CacheListing
// ---------------------------------------------------------------------------

/// The result of reading the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheListing {
    /// Records that passed the storage-class filter, in file order.
    pub records: Vec<ObjectRecord>,
    /// Every storage class present in the file, including filtered-out rows.
    pub classes: BTreeSet<StorageClass>,
}

impl CacheListing {
    /// Sum of the sizes of the returned records.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }

    /// The seen classes joined with `", "`.
    #[must_use]
    pub fn class_summary(&self) -> String {
        self.classes
            .iter()
            .map(StorageClass::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// CacheStore
// ---------------------------------------------------------------------------

/// Handle on the cache file.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    /// Create a store for the given file and freshness window.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    /// Create a store from the configured path and TTL.
    #[must_use]
    pub fn from_config(config: &S3duConfig) -> Self {
        Self::new(config.cache_file.clone(), config.cache_ttl())
    }

    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the cache can be used instead of listing S3.
    ///
    /// Always false when `force_refresh` is set.
    #[must_use]
    pub fn is_fresh(&self, force_refresh: bool) -> bool {
        !force_refresh && self.is_fresh_at(SystemTime::now())
    }

    /// Whether the cache file exists and was modified less than the TTL
    /// before `now`.
    #[must_use]
    pub fn is_fresh_at(&self, now: SystemTime) -> bool {
        let Ok(modified) = fs::metadata(&self.path).and_then(|m| m.modified()) else {
            return false;
        };
        // An mtime in the future counts as just written.
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        trace!(path = %self.path.display(), age_secs = age.as_secs(), "cache age");
        age < self.ttl
    }

    /// Open an incremental writer. The cache file is untouched until the
    /// writer is committed.
    pub fn writer(&self) -> S3duResult<CacheWriter> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| S3duError::io(&dir, e))?;

        let temp = tempfile::Builder::new()
            .prefix(".s3du-cache")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| S3duError::io(&dir, e))?;

        debug!(path = %self.path.display(), temp = %temp.path().display(), "writing cache");
        Ok(CacheWriter {
            target: self.path.clone(),
            out: BufWriter::new(temp),
            count: 0,
        })
    }

    /// Overwrite the cache with `records`. Returns the number written.
    pub fn write<'a, I>(&self, records: I) -> S3duResult<usize>
    where
        I: IntoIterator<Item = &'a ObjectRecord>,
    {
        let mut writer = self.writer()?;
        for record in records {
            writer.push(record)?;
        }
        writer.commit()
    }

    /// Read every row of the cache, keeping only records of class `filter`
    /// when one is given.
    pub fn read_all(&self, filter: Option<&StorageClass>) -> S3duResult<CacheListing> {
        let content = fs::read_to_string(&self.path).map_err(|e| S3duError::io(&self.path, e))?;

        let mut listing = CacheListing::default();
        for row in Rows::new(&content) {
            let row = row.map_err(|e| self.parse_error(e.line, e.message))?;
            let record = self.parse_record(row)?;

            listing.classes.insert(record.storage_class.clone());
            if filter.is_some_and(|class| *class != record.storage_class) {
                continue;
            }
            listing.records.push(record);
        }

        debug!(
            path = %self.path.display(),
            records = listing.records.len(),
            classes = %listing.class_summary(),
            "read cache"
        );
        Ok(listing)
    }

    fn parse_record(&self, row: Row) -> S3duResult<ObjectRecord> {
        let line = row.line;
        let [bucket, key, size, class]: [String; ROW_ARITY] =
            row.fields.try_into().map_err(|fields: Vec<String>| {
                self.parse_error(
                    line,
                    format!("expected {ROW_ARITY} fields, found {}", fields.len()),
                )
            })?;

        let size = size
            .parse::<u64>()
            .map_err(|e| self.parse_error(line, format!("invalid size `{size}`: {e}")))?;

        Ok(ObjectRecord {
            bucket,
            key,
            size,
            storage_class: StorageClass::from(class),
        })
    }

    fn parse_error(&self, line: usize, message: String) -> S3duError {
        S3duError::Parse {
            path: self.path.clone(),
            line,
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// CacheWriter
// ---------------------------------------------------------------------------

/// Streams records into a pending cache file.
///
/// Dropping the writer without calling [`CacheWriter::commit`] discards the
/// pending file and leaves the previous cache in place.
#[derive(Debug)]
pub struct CacheWriter {
    target: PathBuf,
    out: BufWriter<NamedTempFile>,
    count: usize,
}

impl CacheWriter {
    /// Append one record.
    pub fn push(&mut self, record: &ObjectRecord) -> S3duResult<()> {
        let size = record.size.to_string();
        row::write_row(
            &mut self.out,
            &[
                record.bucket.as_str(),
                record.key.as_str(),
                size.as_str(),
                record.storage_class.as_str(),
            ],
        )
        .map_err(|e| S3duError::io(self.out.get_ref().path(), e))?;
        self.count += 1;
        Ok(())
    }

    /// Number of records written so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Flush the pending file and move it over the cache file.
    pub fn commit(mut self) -> S3duResult<usize> {
        self.out
            .flush()
            .map_err(|e| S3duError::io(self.out.get_ref().path(), e))?;
        let temp = self
            .out
            .into_inner()
            .map_err(|e| S3duError::io(&self.target, e.into_error()))?;
        temp.persist(&self.target)
            .map_err(|e| S3duError::io(&self.target, e.error))?;

        debug!(path = %self.target.display(), count = self.count, "cache committed");
        Ok(self.count)
    }
}

impl RecordSink for CacheWriter {
    fn accept(&mut self, record: ObjectRecord) -> S3duResult<()> {
        self.push(&record)
    }
}
