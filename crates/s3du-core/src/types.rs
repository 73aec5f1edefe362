//! Listing record types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// S3 storage class of an object.
///
/// Labels outside the known set are preserved verbatim in [`StorageClass::Other`]
/// so that cache rows round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageClass {
    /// Default variant.
    #[default]
    Standard,
    StandardIa,
    Glacier,
    GlacierIr,
    DeepArchive,
    IntelligentTiering,
    OnezoneIa,
    ReducedRedundancy,
    ExpressOnezone,
    Outposts,
    Snow,
    /// A label not in the list above.
    Other(String),
}

impl StorageClass {
    /// Returns the wire name of this storage class.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Standard => "STANDARD",
            Self::StandardIa => "STANDARD_IA",
            Self::Glacier => "GLACIER",
            Self::GlacierIr => "GLACIER_IR",
            Self::DeepArchive => "DEEP_ARCHIVE",
            Self::IntelligentTiering => "INTELLIGENT_TIERING",
            Self::OnezoneIa => "ONEZONE_IA",
            Self::ReducedRedundancy => "REDUCED_REDUNDANCY",
            Self::ExpressOnezone => "EXPRESS_ONEZONE",
            Self::Outposts => "OUTPOSTS",
            Self::Snow => "SNOW",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for StorageClass {
    fn from(s: &str) -> Self {
        match s {
            "STANDARD" => Self::Standard,
            "STANDARD_IA" => Self::StandardIa,
            "GLACIER" => Self::Glacier,
            "GLACIER_IR" => Self::GlacierIr,
            "DEEP_ARCHIVE" => Self::DeepArchive,
            "INTELLIGENT_TIERING" => Self::IntelligentTiering,
            "ONEZONE_IA" => Self::OnezoneIa,
            "REDUCED_REDUNDANCY" => Self::ReducedRedundancy,
            "EXPRESS_ONEZONE" => Self::ExpressOnezone,
            "OUTPOSTS" => Self::Outposts,
            "SNOW" => Self::Snow,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for StorageClass {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<StorageClass> for String {
    fn from(class: StorageClass) -> Self {
        match class {
            StorageClass::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

/// One listed S3 object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Bucket the object lives in.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// Storage tier.
    pub storage_class: StorageClass,
}

impl ObjectRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        size: u64,
        storage_class: StorageClass,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size,
            storage_class,
        }
    }

    /// The object's location in the viewer tree: `/{bucket}/{key}`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}/{}", self.bucket, self.key)
    }
}
