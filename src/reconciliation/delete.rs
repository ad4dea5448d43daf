use super::context::ExecContext;
use super::outcome::OperationOutcome;
use crate::manifest::ManifestSet;
use crate::report::Phase;
use crate::storage::StorageError;
use std::collections::HashMap;
use thiserror::Error;

/// A delete-many request rejected as a whole
#[derive(Error, Debug)]
#[error("Batch delete of {} keys failed: {source}", .failed_keys.len())]
pub struct BatchDeleteError {
    pub failed_keys: Vec<String>,
    #[source]
    pub source: StorageError,
}

/// Outcomes of the delete phase
#[derive(Debug, Clone, Default)]
pub struct DeleteReport {
    pub outcomes: Vec<OperationOutcome>,
    /// Orphans never dispatched because the run was cancelled
    pub skipped: usize,
    /// Number of delete-many requests issued
    pub batches: usize,
}

/// Issue one delete-many request.
///
/// Per-key errors inside an accepted request become failed outcomes; a
/// rejected request fails every key in it.
pub async fn delete_batch(
    ctx: &ExecContext<'_>,
    keys: &[String],
) -> Result<Vec<OperationOutcome>, BatchDeleteError> {
    let response = ctx
        .storage
        .delete_objects(ctx.bucket, keys)
        .await
        .map_err(|source| BatchDeleteError {
            failed_keys: keys.to_vec(),
            source,
        })?;

    let errors: HashMap<&str, &str> = response
        .errors
        .iter()
        .map(|e| (e.key.as_str(), e.message.as_str()))
        .collect();

    Ok(keys
        .iter()
        .map(|key| match errors.get(key.as_str()) {
            Some(message) => OperationOutcome::failed(key.clone(), message),
            None => OperationOutcome::succeeded(key.clone()),
        })
        .collect())
}

/// Delete every orphan in batches no larger than the transport's cap.
///
/// Batches go out one after another; outcomes are only aggregated here, so
/// nothing else observes a partially built list.
pub async fn delete_orphans(ctx: &ExecContext<'_>, orphans: &ManifestSet) -> DeleteReport {
    let mut report = DeleteReport::default();
    if orphans.is_empty() {
        return report;
    }
    if ctx.cancel.is_cancelled() {
        report.skipped = orphans.len();
        return report;
    }

    ctx.reporter.phase_started(Phase::Delete, orphans.len());

    let keys: Vec<String> = orphans.iter().cloned().collect();
    let cap = ctx.storage.max_delete_batch().max(1);

    for batch in keys.chunks(cap) {
        if ctx.cancel.is_cancelled() {
            report.skipped += batch.len();
            continue;
        }

        report.batches += 1;
        let outcomes = match delete_batch(ctx, batch).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                let cause = e.source.to_string();
                e.failed_keys
                    .into_iter()
                    .map(|key| OperationOutcome::failed(key, &cause))
                    .collect()
            }
        };

        for outcome in &outcomes {
            ctx.reporter.object_finished(Phase::Delete, outcome);
        }
        report.outcomes.extend(outcomes);
    }

    report
}
