mod key;
mod local;
mod remote;
mod types;

pub use key::KeyNormalizer;
pub use local::build_local_manifest;
pub use remote::{fetch_remote_manifest, RemoteListError};
pub use types::{LocalEntry, ManifestSet, RemoteEntry};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to walk publish directory: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Publish directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Publish path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Walked path {path} is outside the publish directory {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("File name is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}

/// Keys of a local manifest
pub fn local_keys(entries: &[LocalEntry]) -> ManifestSet {
    entries.iter().map(|e| e.relative_key.clone()).collect()
}

/// Keys of a remote manifest
pub fn remote_keys(entries: &[RemoteEntry]) -> ManifestSet {
    entries.iter().map(|e| e.key.clone()).collect()
}
