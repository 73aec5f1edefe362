//! Core building blocks for s3du, an ncdu front end for S3.
//!
//! The pipeline is linear: a [`BucketLister`] enumerates objects into the
//! [`CacheStore`], the cached records are read back and folded into a
//! [`DirectoryNode`] tree, the tree is rendered as an [`NcduExport`], and the
//! [`Viewer`] hands the export to `ncdu`.

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod lister;
mod row;
pub mod tree;
pub mod types;
pub mod viewer;

pub use cache::{CacheListing, CacheStore, CacheWriter};
pub use config::S3duConfig;
pub use error::{S3duError, S3duResult};
pub use export::NcduExport;
pub use lister::{
    BucketLister, ListPage, ObjectSource, RecordSink, S3ObjectSource, normalize_prefix,
};
pub use tree::{DirectoryNode, FileEntry};
pub use types::{ObjectRecord, StorageClass};
pub use viewer::Viewer;
