//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services by
//! `Arc`. Request handling never reads process-wide environment variables, which keeps the
//! behaviour consistent across threads and test harnesses.

use crate::constants::{DEFAULT_STORAGE_DIR, UNKNOWN_IDENTIFIER};
use crate::{FilesError, FilesResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    storage_dir: PathBuf,
    pod_name: String,
    node_name: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `pod_name` and `node_name` are opaque identifiers reported by the health check; blank
    /// values are replaced with `"unknown"`.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidConfig` if `storage_dir` is empty.
    pub fn new(
        storage_dir: PathBuf,
        pod_name: impl Into<String>,
        node_name: impl Into<String>,
    ) -> FilesResult<Self> {
        if storage_dir.as_os_str().is_empty() {
            return Err(FilesError::InvalidConfig(
                "storage directory cannot be empty".into(),
            ));
        }

        Ok(Self {
            storage_dir,
            pod_name: identifier_or_unknown(Some(pod_name.into())),
            node_name: identifier_or_unknown(Some(node_name.into())),
        })
    }

    /// Build a configuration from raw, optional environment values.
    ///
    /// Missing or blank values fall back to their documented defaults: the storage directory
    /// to [`DEFAULT_STORAGE_DIR`] and the identifiers to `"unknown"`.
    pub fn from_env_values(
        storage_dir: Option<String>,
        pod_name: Option<String>,
        node_name: Option<String>,
    ) -> FilesResult<Self> {
        let storage_dir = storage_dir
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_DIR.into());

        Self::new(
            PathBuf::from(storage_dir),
            identifier_or_unknown(pod_name),
            identifier_or_unknown(node_name),
        )
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn pod_name(&self) -> &str {
        &self.pod_name
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }
}

fn identifier_or_unknown(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_IDENTIFIER.into())
}
