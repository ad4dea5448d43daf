//! Progress reporting for a deploy run.
//!
//! The engine never logs progress lines itself; it hands them to a
//! [`DeployReporter`]. [`TracingReporter`] is the default sink.

use crate::manifest::RemoteListError;
use crate::reconciliation::{DeploySummary, OperationOutcome};
use std::fmt;
use tracing::{error, info, warn};

/// Which executor an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Delete,
    Upload,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Delete => write!(f, "delete"),
            Phase::Upload => write!(f, "upload"),
        }
    }
}

pub trait DeployReporter: Send + Sync {
    /// Called once before a phase dispatches its first object.
    fn phase_started(&self, phase: Phase, objects: usize);

    /// Called once per object as soon as its outcome is known.
    fn object_finished(&self, phase: Phase, outcome: &OperationOutcome);

    /// Called when the remote listing fails and deletion is skipped.
    fn listing_failed(&self, error: &RemoteListError);

    /// Called once with the final summary.
    fn finished(&self, summary: &DeploySummary);
}

/// Reports progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl DeployReporter for TracingReporter {
    fn phase_started(&self, phase: Phase, objects: usize) {
        match phase {
            Phase::Delete => info!("Deleting {} files from COS...", objects),
            Phase::Upload => info!("Uploading {} files to COS...", objects),
        }
    }

    fn object_finished(&self, phase: Phase, outcome: &OperationOutcome) {
        match &outcome.error {
            None => info!(%phase, "Done: {}", outcome.key),
            Some(err) => error!(%phase, "Error: {}: {}", outcome.key, err),
        }
    }

    fn listing_failed(&self, error: &RemoteListError) {
        warn!("Skipping deletion, remote listing failed: {}", error);
    }

    fn finished(&self, summary: &DeploySummary) {
        info!(
            uploaded = summary.uploaded.len(),
            upload_failures = summary.upload_failures.len(),
            deleted = summary.deleted.len(),
            delete_failures = summary.delete_failures.len(),
            cancelled = summary.cancelled,
            "Deploy finished"
        );
    }
}
