use crate::models::{HealthRes, HealthState, StorageStatus};
use chrono::Utc;
use filestore_core::constants::{HEALTH_CHECK_CONTENT, HEALTH_CHECK_FILENAME};
use filestore_core::CoreConfig;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Health check for the storage root.
///
/// Writes and removes a sentinel file to prove the root is writable. A missing root still
/// reports healthy (storage may not be mounted yet); any failure during the check reports
/// unhealthy. The check never returns an error to its caller.
///
/// Each check uses its own sentinel name so overlapping checks never remove each other's
/// file. Clones share the sequence counter.
#[derive(Clone, Debug)]
pub struct HealthService {
    cfg: Arc<CoreConfig>,
    check_seq: Arc<AtomicU64>,
}

impl HealthService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            check_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Checks the storage root and builds the report.
    ///
    /// # Returns
    /// A `HealthRes` carrying the current timestamp and deployment identifiers, with either a
    /// `storage_status` (healthy) or an `error` (unhealthy).
    pub fn check_health(&self) -> HealthRes {
        let root = self.cfg.storage_dir();
        let seq = self.check_seq.fetch_add(1, Ordering::Relaxed);
        let (status, storage_status, error) = match check_storage(root, &sentinel_filename(seq)) {
            Ok(storage_status) => (HealthState::Healthy, Some(storage_status), None),
            Err(e) => {
                tracing::warn!("health check failed: {}", e);
                (HealthState::Unhealthy, None, Some(e))
            }
        };

        HealthRes {
            status,
            timestamp: Utc::now().to_rfc3339(),
            storage_path: root.display().to_string(),
            storage_status,
            pod_name: self.cfg.pod_name().to_string(),
            node_name: self.cfg.node_name().to_string(),
            error,
        }
    }
}

/// Sentinel name for the `seq`-th check of a service in this process.
///
/// Always begins with `.`, so it can never clash with a name creatable through the API.
pub fn sentinel_filename(seq: u64) -> String {
    format!("{}.{}.{}", HEALTH_CHECK_FILENAME, std::process::id(), seq)
}

fn check_storage(root: &Path, sentinel_name: &str) -> Result<StorageStatus, String> {
    if !root.exists() {
        return Ok(StorageStatus::DirectoryNotFound);
    }

    let sentinel = root.join(sentinel_name);
    fs::write(&sentinel, HEALTH_CHECK_CONTENT)
        .map_err(|e| format!("failed to write {}: {}", sentinel.display(), e))?;
    fs::remove_file(&sentinel)
        .map_err(|e| format!("failed to remove {}: {}", sentinel.display(), e))?;

    Ok(StorageStatus::Accessible)
}
