use super::context::ExecContext;
use super::delete::delete_orphans;
use super::outcome::DeploySummary;
use super::plan::build_reconciliation_plan;
use super::upload::upload_all;
use crate::cancel::CancelSignal;
use crate::config::{BucketConfig, DeployConfig};
use crate::manifest::{build_local_manifest, fetch_remote_manifest, KeyNormalizer, ManifestError};
use crate::report::DeployReporter;
use crate::storage::ObjectStorage;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Manifest error: {0}")]
    ManifestError(#[from] ManifestError),
}

/// Inputs of a single deploy run
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub public_dir: PathBuf,
    pub bucket: BucketConfig,
    pub path_prefix: String,
    pub concurrency: usize,
    pub normalizer: KeyNormalizer,
}

impl DeployOptions {
    /// Options for a validated configuration
    pub fn from_config(config: &DeployConfig) -> Self {
        Self {
            public_dir: config.public_dir.clone(),
            bucket: config.bucket_config(),
            path_prefix: config.path_prefix.clone(),
            concurrency: config.concurrency,
            normalizer: KeyNormalizer::native(),
        }
    }
}

/// Mirror the publish directory into the bucket prefix.
///
/// Only a failure to build the local manifest aborts the run. A failed
/// listing skips deletion but uploads still run, and per-object failures end
/// up in the summary. Deletes and uploads run concurrently once the plan is
/// known.
pub async fn execute_deploy(
    storage: &dyn ObjectStorage,
    options: &DeployOptions,
    reporter: &dyn DeployReporter,
    cancel: &CancelSignal,
) -> Result<DeploySummary, DeployError> {
    let local = build_local_manifest(&options.public_dir, &options.normalizer)?;
    info!(
        files = local.len(),
        dir = %options.public_dir.display(),
        "Built local manifest"
    );

    let list_prefix = options.normalizer.list_prefix(&options.path_prefix);
    let mut summary = DeploySummary::default();

    let remote = match fetch_remote_manifest(storage, &options.bucket, &list_prefix).await {
        Ok(remote) => remote,
        Err(e) => {
            reporter.listing_failed(&e);
            summary.list_error = Some(e.to_string());
            Vec::new()
        }
    };

    let plan = build_reconciliation_plan(
        &local,
        &remote,
        &options.path_prefix,
        &options.normalizer,
    );
    debug!(
        to_delete = plan.to_delete.len(),
        to_upload = plan.to_upload.len(),
        "Computed reconciliation plan"
    );

    let ctx = ExecContext {
        storage,
        bucket: &options.bucket,
        reporter,
        cancel,
    };

    let (deletes, uploads) = tokio::join!(
        delete_orphans(&ctx, &plan.to_delete),
        upload_all(
            &ctx,
            &plan.to_upload,
            &options.path_prefix,
            &options.normalizer,
            options.concurrency,
        )
    );

    summary.skipped_deletes = deletes.skipped;
    summary.skipped_uploads = uploads.skipped;
    summary.record_deletes(deletes.outcomes);
    summary.record_uploads(uploads.outcomes);
    summary.cancelled = summary.skipped_uploads + summary.skipped_deletes > 0;

    reporter.finished(&summary);
    Ok(summary)
}
