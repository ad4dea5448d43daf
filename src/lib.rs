pub mod cancel;
pub mod config;
pub mod manifest;
pub mod reconciliation;
pub mod report;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use cancel::{CancelHandle, CancelSignal};
pub use config::{
    load_config, read_config, BucketConfig, ConfigError, ConfigOverrides, DeployConfig,
};
pub use manifest::{
    build_local_manifest, fetch_remote_manifest, KeyNormalizer, LocalEntry, ManifestError,
    ManifestSet, RemoteEntry, RemoteListError,
};
pub use reconciliation::{
    build_reconciliation_plan, execute_deploy, BatchDeleteError, DeployError, DeployOptions,
    DeploySummary, ObjectFailure, OperationOutcome, ReconciliationPlan, UploadError,
};
pub use report::{DeployReporter, Phase, TracingReporter};
pub use storage::{CosStorage, DeleteResponse, KeyError, ListPage, ObjectStorage, StorageError};
