//! ncdu JSON export.
//!
//! The format is a four-element array:
//!
//! ```text
//! [1, 0, {"progname": "s3du", "progver": "...", "timestamp": 1700000000},
//!  [{"name": "S3"},
//!   [{"name": "bucket"}, {"name": "file", "asize": 10, "dsize": 10}, ...],
//!   ...]]
//! ```
//!
//! Each directory is an array whose head is `{"name": ...}`, followed by its
//! subdirectories and then its files. Entries with an empty name are written
//! as `(unnamed)`.

use std::io::Write;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::S3duResult;
use crate::tree::{DirectoryNode, FileEntry};

/// Export format major version.
pub const MAJOR_VERSION: u32 = 1;

/// Export format minor version.
pub const MINOR_VERSION: u32 = 0;

/// Name given to the root directory.
pub const ROOT_NAME: &str = "S3";

/// Placeholder for entries with an empty name.
pub const UNNAMED: &str = "(unnamed)";

const PROGNAME: &str = "s3du";
const PROGVER: &str = env!("CARGO_PKG_VERSION");

/// A borrowed view of a tree, serializable as an ncdu export.
#[derive(Debug, Clone, Copy)]
pub struct NcduExport<'a> {
    root: &'a DirectoryNode,
    timestamp: i64,
}

impl<'a> NcduExport<'a> {
    /// Export `root`, stamped with the current time.
    #[must_use]
    pub fn new(root: &'a DirectoryNode) -> Self {
        Self::with_timestamp(root, chrono::Utc::now().timestamp())
    }

    /// Export `root` with an explicit unix timestamp.
    #[must_use]
    pub fn with_timestamp(root: &'a DirectoryNode, timestamp: i64) -> Self {
        Self { root, timestamp }
    }

    /// Stream the export as JSON into `out`.
    pub fn write_to<W: Write>(&self, out: W) -> S3duResult<()> {
        serde_json::to_writer(out, self)?;
        Ok(())
    }

    /// Render the export as a JSON byte vector.
    pub fn to_vec(&self) -> S3duResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[derive(serde::Serialize)]
struct Metadata {
    progname: &'static str,
    progver: &'static str,
    timestamp: i64,
}

#[derive(serde::Serialize)]
struct DirHeader<'a> {
    name: &'a str,
}

#[derive(serde::Serialize)]
struct Leaf<'a> {
    name: &'a str,
    asize: u64,
    dsize: u64,
}

impl<'a> From<&'a FileEntry> for Leaf<'a> {
    fn from(file: &'a FileEntry) -> Self {
        Self {
            name: display_name(&file.name),
            asize: file.size,
            dsize: file.size,
        }
    }
}

/// A directory together with the name it is listed under.
struct Branch<'a> {
    name: &'a str,
    node: &'a DirectoryNode,
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { UNNAMED } else { name }
}

impl Serialize for NcduExport<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        seq.serialize_element(&MAJOR_VERSION)?;
        seq.serialize_element(&MINOR_VERSION)?;
        seq.serialize_element(&Metadata {
            progname: PROGNAME,
            progver: PROGVER,
            timestamp: self.timestamp,
        })?;
        seq.serialize_element(&Branch {
            name: ROOT_NAME,
            node: self.root,
        })?;
        seq.end()
    }
}

impl Serialize for Branch<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + self.node.dirs.len() + self.node.files.len();
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&DirHeader {
            name: display_name(self.name),
        })?;
        for (name, node) in &self.node.dirs {
            seq.serialize_element(&Branch { name, node })?;
        }
        for file in &self.node.files {
            seq.serialize_element(&Leaf::from(file))?;
        }
        seq.end()
    }
}
