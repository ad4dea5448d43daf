use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A file in the local publish directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalEntry {
    pub absolute_path: PathBuf,
    /// Path relative to the publish directory, always `/`-separated
    pub relative_key: String,
}

/// An object found under the target prefix.
///
/// `etag`, `size` and `last_modified` are informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    pub key: String,
    pub etag: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Unique, ordered set of object keys
pub type ManifestSet = BTreeSet<String>;
