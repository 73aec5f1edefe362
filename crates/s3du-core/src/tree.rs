//! Directory tree built from flat object paths.
//!
//! Paths have the form `/bucket/key/.../leaf`. The root node stands for the
//! whole S3 namespace and absorbs the empty segment in front of the leading
//! `/`; any other empty segment (`a//b`, or the trailing one of a `dir/`
//! folder marker) is kept as an entry with an empty name.

use std::collections::BTreeMap;

use crate::types::ObjectRecord;

/// A leaf entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Last path segment.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// A directory: named subdirectories plus leaf files in insertion order.
///
/// A file and a subdirectory may share a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    /// Subdirectories by name.
    pub dirs: BTreeMap<String, DirectoryNode>,
    /// Files directly in this directory.
    pub files: Vec<FileEntry>,
}

impl DirectoryNode {
    /// An empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from `(path, size)` pairs.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = (P, u64)>,
        P: AsRef<str>,
    {
        let mut root = Self::new();
        for (path, size) in paths {
            root.insert(path.as_ref(), size);
        }
        root
    }

    /// Build a tree from listed records, placing each at `/{bucket}/{key}`.
    #[must_use]
    pub fn from_records(records: &[ObjectRecord]) -> Self {
        Self::from_paths(records.iter().map(|r| (r.path(), r.size)))
    }

    /// Insert one file, creating intermediate directories as needed.
    pub fn insert(&mut self, path: &str, size: u64) {
        let path = path.strip_prefix('/').unwrap_or(path);
        let (dirs, name) = match path.rsplit_once('/') {
            Some((dirs, name)) => (Some(dirs), name),
            None => (None, path),
        };

        let mut node = self;
        for segment in dirs.into_iter().flat_map(|d| d.split('/')) {
            node = node.dirs.entry(segment.to_owned()).or_default();
        }
        node.files.push(FileEntry {
            name: name.to_owned(),
            size,
        });
    }

    /// Walk to the subdirectory at `path` (segments separated by `/`).
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Self> {
        let path = path.strip_prefix('/').unwrap_or(path);
        if path.is_empty() {
            return Some(self);
        }
        path.split('/')
            .try_fold(self, |node, segment| node.dirs.get(segment))
    }

    /// Whether the directory has neither files nor subdirectories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }

    /// Total size of every file below this directory.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum::<u64>()
            + self.dirs.values().map(Self::total_size).sum::<u64>()
    }

    /// Number of files below this directory.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len() + self.dirs.values().map(Self::file_count).sum::<usize>()
    }
}
