use serde::Serialize;

/// Result of a single upload or delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub key: String,
    pub ok: bool,
    pub error: Option<String>,
}

impl OperationOutcome {
    pub fn succeeded(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ok: true,
            error: None,
        }
    }

    pub fn failed(key: impl Into<String>, error: impl ToString) -> Self {
        Self {
            key: key.into(),
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

/// A failed object in the run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectFailure {
    pub key: String,
    pub error: String,
}

/// Everything a deploy run did
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploySummary {
    pub uploaded: Vec<String>,
    pub upload_failures: Vec<ObjectFailure>,
    pub deleted: Vec<String>,
    pub delete_failures: Vec<ObjectFailure>,
    /// Set when the remote listing failed and deletion was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_error: Option<String>,
    pub cancelled: bool,
    /// Uploads never dispatched because the run was cancelled
    pub skipped_uploads: usize,
    /// Deletes never dispatched because the run was cancelled
    pub skipped_deletes: usize,
}

impl DeploySummary {
    pub(crate) fn record_uploads(&mut self, outcomes: Vec<OperationOutcome>) {
        let (uploaded, failures) = split_outcomes(outcomes);
        self.uploaded = uploaded;
        self.upload_failures = failures;
    }

    pub(crate) fn record_deletes(&mut self, outcomes: Vec<OperationOutcome>) {
        let (deleted, failures) = split_outcomes(outcomes);
        self.deleted = deleted;
        self.delete_failures = failures;
    }

    /// True when anything failed, including the remote listing
    pub fn has_failures(&self) -> bool {
        !self.upload_failures.is_empty()
            || !self.delete_failures.is_empty()
            || self.list_error.is_some()
    }
}

fn split_outcomes(outcomes: Vec<OperationOutcome>) -> (Vec<String>, Vec<ObjectFailure>) {
    let mut succeeded = Vec::new();
    let mut failures = Vec::new();

    for outcome in outcomes {
        if outcome.ok {
            succeeded.push(outcome.key);
        } else {
            failures.push(ObjectFailure {
                key: outcome.key,
                error: outcome.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
    }

    succeeded.sort();
    failures.sort_by(|a, b| a.key.cmp(&b.key));
    (succeeded, failures)
}
