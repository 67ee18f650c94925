//! Constants used throughout the file store core crate.

/// Default storage root when `FILES_STORAGE_PATH` is not set.
pub const DEFAULT_STORAGE_DIR: &str = "/app/files";

/// Value reported for deployment identifiers that were not provided.
pub const UNKNOWN_IDENTIFIER: &str = "unknown";

/// MIME type reported when the filename extension is not recognised.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Sentinel written and removed by the health check.
pub const HEALTH_CHECK_FILENAME: &str = ".health_check";

/// Content of the health check sentinel.
pub const HEALTH_CHECK_CONTENT: &str = "health_check";
