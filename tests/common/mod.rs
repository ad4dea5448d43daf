#![allow(dead_code)]

use async_trait::async_trait;
use cos_deployer::config::BucketConfig;
use cos_deployer::manifest::{RemoteListError, RemoteEntry};
use cos_deployer::reconciliation::{DeploySummary, OperationOutcome};
use cos_deployer::report::{DeployReporter, Phase};
use cos_deployer::storage::{DeleteResponse, KeyError, ListPage, ObjectStorage, StorageError};
use cos_deployer::CancelHandle;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `files` (relative path, content) below `root`
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Should create parent dir");
        }
        std::fs::write(full, content).expect("Should write file");
    }
}

pub fn bucket() -> BucketConfig {
    BucketConfig {
        bucket: "blog-1250000000".to_string(),
        region: "ap-guangzhou".to_string(),
    }
}

/// In-memory object store with paging, batch caps and failure injection
pub struct MemoryStorage {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    page_size: usize,
    batch_cap: usize,
    overlap_pages: bool,
    cycle_tokens: Vec<String>,
    fail_list: bool,
    reject_deletes: bool,
    fail_puts: HashSet<String>,
    fail_delete_keys: HashSet<String>,
    put_delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    list_calls: Mutex<Vec<Option<String>>>,
    delete_calls: Mutex<Vec<Vec<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            page_size: 1000,
            batch_cap: 1000,
            overlap_pages: false,
            cycle_tokens: Vec::new(),
            fail_list: false,
            reject_deletes: false,
            fail_puts: HashSet::new(),
            fail_delete_keys: HashSet::new(),
            put_delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            list_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_objects(self, keys: &[&str]) -> Self {
        {
            let mut objects = self.objects.lock().unwrap();
            for key in keys {
                objects.insert(key.to_string(), b"remote".to_vec());
            }
        }
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Repeat the last key of each page at the start of the next one
    pub fn with_overlapping_pages(mut self) -> Self {
        self.overlap_pages = true;
        self
    }

    /// Hand out `tokens` in a loop instead of ever finishing the listing
    pub fn with_cycling_tokens(mut self, tokens: &[&str]) -> Self {
        self.cycle_tokens = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_batch_cap(mut self, batch_cap: usize) -> Self {
        self.batch_cap = batch_cap;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn rejecting_deletes(mut self) -> Self {
        self.reject_deletes = true;
        self
    }

    pub fn failing_put(mut self, key: &str) -> Self {
        self.fail_puts.insert(key.to_string());
        self
    }

    pub fn failing_delete(mut self, key: &str) -> Self {
        self.fail_delete_keys.insert(key.to_string());
        self
    }

    pub fn with_put_delay(mut self, delay: Duration) -> Self {
        self.put_delay = Some(delay);
        self
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn list_calls(&self) -> Vec<Option<String>> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<Vec<String>> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn list_objects(
        &self,
        _bucket: &BucketConfig,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StorageError> {
        self.list_calls.lock().unwrap().push(continuation.clone());

        if self.fail_list {
            return Err(StorageError::List {
                prefix: prefix.to_string(),
                message: "AccessDenied".to_string(),
            });
        }

        if !self.cycle_tokens.is_empty() {
            let next = match continuation.as_deref() {
                None => 0,
                Some(token) => {
                    let index = self
                        .cycle_tokens
                        .iter()
                        .position(|t| t == token)
                        .expect("Token should come from the cycle");
                    (index + 1) % self.cycle_tokens.len()
                }
            };
            return Ok(ListPage {
                entries: Vec::new(),
                next_continuation: Some(self.cycle_tokens[next].clone()),
            });
        }

        let keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();

        let start: usize = continuation
            .as_deref()
            .map(|t| t.parse().expect("Token should be an index"))
            .unwrap_or(0);
        let end = (start + self.page_size).min(keys.len());
        let page_start = if self.overlap_pages && start > 0 {
            start - 1
        } else {
            start
        };

        let entries = keys[page_start..end]
            .iter()
            .map(|key| RemoteEntry {
                key: key.clone(),
                etag: "\"etag\"".to_string(),
                size: 6,
                last_modified: None,
            })
            .collect();

        Ok(ListPage {
            entries,
            next_continuation: (end < keys.len()).then(|| end.to_string()),
        })
    }

    async fn put_object(
        &self,
        _bucket: &BucketConfig,
        key: &str,
        mut body: tokio::fs::File,
        content_length: u64,
    ) -> Result<(), StorageError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.put_delay {
            tokio::time::sleep(delay).await;
        }

        let mut data = Vec::new();
        let read = body.read_to_end(&mut data).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        read?;

        if self.fail_puts.contains(key) {
            return Err(StorageError::Put {
                key: key.to_string(),
                message: "SlowDown".to_string(),
            });
        }
        assert_eq!(data.len() as u64, content_length, "Length should match body");

        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn delete_objects(
        &self,
        _bucket: &BucketConfig,
        keys: &[String],
    ) -> Result<DeleteResponse, StorageError> {
        assert!(keys.len() <= self.batch_cap, "Batch should respect the cap");
        self.delete_calls.lock().unwrap().push(keys.to_vec());

        if self.reject_deletes {
            return Err(StorageError::Delete("MalformedXML".to_string()));
        }

        let mut objects = self.objects.lock().unwrap();
        let mut errors = Vec::new();
        for key in keys {
            if self.fail_delete_keys.contains(key) {
                errors.push(KeyError {
                    key: key.clone(),
                    message: "AccessDenied".to_string(),
                });
            } else {
                objects.remove(key);
            }
        }

        Ok(DeleteResponse { errors })
    }

    fn max_delete_batch(&self) -> usize {
        self.batch_cap
    }
}

/// Reporter that records every event
#[derive(Default)]
pub struct RecordingReporter {
    pub phases: Mutex<Vec<(Phase, usize)>>,
    pub finished: Mutex<Vec<(Phase, OperationOutcome)>>,
    pub listing_errors: Mutex<Vec<String>>,
    pub summaries: AtomicUsize,
}

impl RecordingReporter {
    pub fn finished_in(&self, phase: Phase) -> Vec<OperationOutcome> {
        self.finished
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == phase)
            .map(|(_, o)| o.clone())
            .collect()
    }
}

impl DeployReporter for RecordingReporter {
    fn phase_started(&self, phase: Phase, objects: usize) {
        self.phases.lock().unwrap().push((phase, objects));
    }

    fn object_finished(&self, phase: Phase, outcome: &OperationOutcome) {
        self.finished.lock().unwrap().push((phase, outcome.clone()));
    }

    fn listing_failed(&self, error: &RemoteListError) {
        self.listing_errors.lock().unwrap().push(error.to_string());
    }

    fn finished(&self, _summary: &DeploySummary) {
        self.summaries.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reporter that raises cancellation once `after` objects have finished
pub struct CancellingReporter {
    handle: CancelHandle,
    after: usize,
    seen: AtomicUsize,
}

impl CancellingReporter {
    pub fn new(handle: CancelHandle, after: usize) -> Self {
        Self {
            handle,
            after,
            seen: AtomicUsize::new(0),
        }
    }
}

impl DeployReporter for CancellingReporter {
    fn phase_started(&self, _phase: Phase, _objects: usize) {}

    fn object_finished(&self, _phase: Phase, _outcome: &OperationOutcome) {
        if self.seen.fetch_add(1, Ordering::SeqCst) + 1 >= self.after {
            self.handle.cancel();
        }
    }

    fn listing_failed(&self, _error: &RemoteListError) {}

    fn finished(&self, _summary: &DeploySummary) {}
}
