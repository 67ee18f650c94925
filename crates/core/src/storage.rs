//! Flat file storage against a single root directory.
//!
//! Every operation re-touches the filesystem; nothing is cached between calls. Names are
//! passed through [`Filename::sanitize`] before they are joined onto the root, so no
//! operation can reach a path outside of it.
//!
//! There is no locking. Two creates of the same name race at the filesystem level and the
//! last write to complete wins; a listing may be stale by the time the caller acts on it.

use crate::config::CoreConfig;
use crate::constants::DEFAULT_MIME_TYPE;
use crate::{FilesError, FilesResult};
use chrono::{DateTime, Utc};
use filestore_types::Filename;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file found directly under the storage root.
///
/// `name` is a plain `String` rather than a [`Filename`]: files placed in the directory out of
/// band (hidden files, for example) are still listed even though they could not be created
/// through this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub mime_type: String,
}

/// Service for the list/create/read/delete operations.
#[derive(Clone, Debug)]
pub struct FileStorageService {
    cfg: Arc<CoreConfig>,
}

impl FileStorageService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Returns the configured storage root.
    pub fn storage_dir(&self) -> &Path {
        self.cfg.storage_dir()
    }

    /// Lists the regular files directly under the storage root, newest first.
    ///
    /// Subdirectories are skipped. If the root does not exist yet it is created and an empty
    /// listing is returned. Entries with equal modification times keep directory order.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::StorageFailure` if the root cannot be created or read, or a file
    /// cannot be inspected.
    pub fn list(&self) -> FilesResult<Vec<StoredFile>> {
        let root = self.storage_dir();

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.ensure_storage_dir()?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(storage_failure("read storage directory", root, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| storage_failure("read storage directory", root, e))?;
            let path = entry.path();

            // Follows symlinks; dangling links and entries removed mid-listing are skipped.
            let metadata = match fs::metadata(&path) {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(storage_failure("inspect file", &path, e)),
            };

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!("skipping non UTF-8 filename: {:?}", raw);
                    continue;
                }
            };

            let modified = metadata
                .modified()
                .map_err(|e| storage_failure("inspect file", &path, e))?;

            files.push(StoredFile {
                mime_type: guess_mime_type(&name),
                name,
                size: metadata.len(),
                modified: DateTime::<Utc>::from(modified),
            });
        }

        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(files)
    }

    /// Writes `content` to `filename`, replacing any existing file of that name.
    ///
    /// # Arguments
    ///
    /// * `filename` - Raw name supplied by the caller; `None` or empty means it was omitted
    /// * `content` - Text to store
    ///
    /// # Returns
    ///
    /// The accepted, sanitised filename.
    ///
    /// # Errors
    ///
    /// - `FilesError::MissingField` if no filename was supplied
    /// - `FilesError::InvalidName` if the name fails sanitisation
    /// - `FilesError::StorageFailure` if the root cannot be created or the write fails
    pub fn create(&self, filename: Option<&str>, content: &str) -> FilesResult<Filename> {
        let raw = filename
            .filter(|f| !f.is_empty())
            .ok_or(FilesError::MissingField)?;
        let filename = Filename::sanitize(raw)?;

        self.ensure_storage_dir()?;

        let path = self.file_path(&filename);
        fs::write(&path, content.as_bytes())
            .map_err(|e| storage_failure("write file", &path, e))?;

        tracing::info!("Created file: {}", filename);
        Ok(filename)
    }

    /// Reads the full content of `filename` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// - `FilesError::InvalidName` if the name fails sanitisation
    /// - `FilesError::NotFound` if no regular file of that name exists
    /// - `FilesError::NotText` if the content is not valid UTF-8
    /// - `FilesError::StorageFailure` for any other I/O problem
    pub fn read(&self, filename: &str) -> FilesResult<String> {
        let filename = Filename::sanitize(filename)?;
        let path = self.file_path(&filename);

        if !path.is_file() {
            return Err(FilesError::NotFound(filename));
        }

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(FilesError::NotFound(filename)),
            Err(e) => return Err(storage_failure("read file", &path, e)),
        };

        String::from_utf8(bytes).map_err(|_| FilesError::NotText(filename))
    }

    /// Removes `filename` from the storage root. There is no undo.
    ///
    /// # Errors
    ///
    /// - `FilesError::InvalidName` if the name fails sanitisation
    /// - `FilesError::NotFound` if no regular file of that name exists
    /// - `FilesError::StorageFailure` if the removal fails
    pub fn delete(&self, filename: &str) -> FilesResult<Filename> {
        let filename = Filename::sanitize(filename)?;
        let path = self.file_path(&filename);

        if !path.is_file() {
            return Err(FilesError::NotFound(filename));
        }

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(FilesError::NotFound(filename)),
            Err(e) => return Err(storage_failure("delete file", &path, e)),
        }

        tracing::info!("Deleted file: {}", filename);
        Ok(filename)
    }

    fn ensure_storage_dir(&self) -> FilesResult<()> {
        let root = self.storage_dir();
        fs::create_dir_all(root).map_err(|e| storage_failure("create storage directory", root, e))
    }

    fn file_path(&self, filename: &Filename) -> PathBuf {
        self.storage_dir().join(filename)
    }
}

/// Best-effort MIME type from the filename extension.
pub fn guess_mime_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}

fn storage_failure(action: &str, path: &Path, err: std::io::Error) -> FilesError {
    FilesError::StorageFailure(format!(
        "failed to {} {}: {}",
        action,
        path.display(),
        err
    ))
}
