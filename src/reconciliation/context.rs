use crate::cancel::CancelSignal;
use crate::config::BucketConfig;
use crate::report::DeployReporter;
use crate::storage::ObjectStorage;

/// Collaborators shared by the upload and delete executors for one run
#[derive(Clone, Copy)]
pub struct ExecContext<'a> {
    pub storage: &'a dyn ObjectStorage,
    pub bucket: &'a BucketConfig,
    pub reporter: &'a dyn DeployReporter,
    pub cancel: &'a CancelSignal,
}
