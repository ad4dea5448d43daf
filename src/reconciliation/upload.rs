use super::context::ExecContext;
use super::outcome::OperationOutcome;
use crate::manifest::{KeyNormalizer, LocalEntry};
use crate::report::Phase;
use crate::storage::StorageError;
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::fs::File;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to read {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to upload {key}: {source}")]
    Transport {
        key: String,
        #[source]
        source: StorageError,
    },
}

/// Outcomes of the upload phase
#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    pub outcomes: Vec<OperationOutcome>,
    /// Entries never dispatched because the run was cancelled
    pub skipped: usize,
}

/// Stream one local file to `key`
pub async fn upload_entry(
    ctx: &ExecContext<'_>,
    entry: &LocalEntry,
    key: &str,
) -> Result<(), UploadError> {
    let read_error = |source| UploadError::Read {
        key: key.to_string(),
        source,
    };

    let file = File::open(&entry.absolute_path).await.map_err(read_error)?;
    let length = file.metadata().await.map_err(read_error)?.len();

    ctx.storage
        .put_object(ctx.bucket, key, file, length)
        .await
        .map_err(|source| UploadError::Transport {
            key: key.to_string(),
            source,
        })
}

/// Upload every entry with at most `concurrency` puts in flight.
///
/// A failed upload never stops its siblings. Once the cancel signal is
/// raised no further entries are dispatched; in-flight puts still finish.
pub async fn upload_all(
    ctx: &ExecContext<'_>,
    entries: &[LocalEntry],
    prefix: &str,
    normalizer: &KeyNormalizer,
    concurrency: usize,
) -> UploadReport {
    if ctx.cancel.is_cancelled() {
        return UploadReport {
            outcomes: Vec::new(),
            skipped: entries.len(),
        };
    }

    ctx.reporter.phase_started(Phase::Upload, entries.len());

    let mut outcomes: Vec<OperationOutcome> = stream::iter(entries)
        .take_while(|_| futures::future::ready(!ctx.cancel.is_cancelled()))
        .map(|entry| async move {
            let key = normalizer.normalize(prefix, &entry.relative_key);
            let outcome = match upload_entry(ctx, entry, &key).await {
                Ok(()) => OperationOutcome::succeeded(key),
                Err(e) => OperationOutcome::failed(key, e),
            };
            ctx.reporter.object_finished(Phase::Upload, &outcome);
            outcome
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    outcomes.sort_by(|a, b| a.key.cmp(&b.key));

    UploadReport {
        skipped: entries.len() - outcomes.len(),
        outcomes,
    }
}
