use super::types::RemoteEntry;
use crate::config::BucketConfig;
use crate::storage::{ObjectStorage, StorageError};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RemoteListError {
    #[error("Failed to list objects under '{prefix}': {source}")]
    Transport {
        prefix: String,
        #[source]
        source: StorageError,
    },

    #[error("Listing under '{prefix}' returned continuation token '{token}' more than once")]
    StalledPagination { prefix: String, token: String },
}

/// Fetch every object under `prefix`, following continuation tokens until
/// the listing is complete.
///
/// Pages are requested strictly one after another. Keys that appear on more
/// than one page are kept once, and keys outside `prefix` are dropped.
/// A continuation token seen twice ends the fetch with
/// [`RemoteListError::StalledPagination`]. The result is sorted by key.
pub async fn fetch_remote_manifest(
    storage: &dyn ObjectStorage,
    bucket: &BucketConfig,
    prefix: &str,
) -> Result<Vec<RemoteEntry>, RemoteListError> {
    let mut entries: BTreeMap<String, RemoteEntry> = BTreeMap::new();
    let mut continuation: Option<String> = None;
    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = storage
            .list_objects(bucket, prefix, continuation.clone())
            .await
            .map_err(|source| RemoteListError::Transport {
                prefix: prefix.to_string(),
                source,
            })?;
        pages += 1;

        for entry in page.entries {
            if entry.key.starts_with(prefix) {
                entries.insert(entry.key.clone(), entry);
            }
        }

        match page.next_continuation {
            Some(next) => {
                if !seen_tokens.insert(next.clone()) {
                    return Err(RemoteListError::StalledPagination {
                        prefix: prefix.to_string(),
                        token: next,
                    });
                }
                continuation = Some(next);
            }
            None => break,
        }
    }

    debug!(
        prefix = %prefix,
        pages,
        objects = entries.len(),
        "Fetched remote manifest"
    );

    Ok(entries.into_values().collect())
}
