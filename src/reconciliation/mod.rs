mod context;
mod delete;
mod execute;
mod outcome;
mod plan;
mod upload;

pub use context::ExecContext;
pub use delete::{delete_batch, delete_orphans, BatchDeleteError, DeleteReport};
pub use execute::{execute_deploy, DeployError, DeployOptions};
pub use outcome::{DeploySummary, ObjectFailure, OperationOutcome};
pub use plan::{build_reconciliation_plan, ReconciliationPlan};
pub use upload::{upload_all, upload_entry, UploadError, UploadReport};
