use crate::manifest::{KeyNormalizer, LocalEntry, ManifestSet, RemoteEntry};

/// What a deploy run will do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// Remote keys under the prefix with no local counterpart
    pub to_delete: ManifestSet,

    /// Every local file. Uploads are unconditional; nothing is compared.
    pub to_upload: Vec<LocalEntry>,
}

impl ReconciliationPlan {
    /// Remote keys the uploads will be written to
    pub fn upload_keys(&self, prefix: &str, normalizer: &KeyNormalizer) -> ManifestSet {
        self.to_upload
            .iter()
            .map(|entry| normalizer.normalize(prefix, &entry.relative_key))
            .collect()
    }
}

/// Build the plan from a local and a remote manifest.
///
/// `to_delete` is the remote keys minus the local keys mapped into `prefix`.
/// Remote keys outside the prefix directory are never scheduled. Pure: no
/// disk or network access.
pub fn build_reconciliation_plan(
    local: &[LocalEntry],
    remote: &[RemoteEntry],
    prefix: &str,
    normalizer: &KeyNormalizer,
) -> ReconciliationPlan {
    let list_prefix = normalizer.list_prefix(prefix);

    let mut plan = ReconciliationPlan {
        to_delete: ManifestSet::new(),
        to_upload: local.to_vec(),
    };

    let local_keys = plan.upload_keys(prefix, normalizer);

    plan.to_delete = remote
        .iter()
        .filter(|entry| entry.key.starts_with(&list_prefix))
        .filter(|entry| !local_keys.contains(&entry.key))
        .map(|entry| entry.key.clone())
        .collect();

    plan
}
