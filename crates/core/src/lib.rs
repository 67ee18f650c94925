//! # File Store Core
//!
//! Core business logic for the flat file store.
//!
//! This crate contains pure data operations against the storage root:
//! - Listing, creating, reading and deleting files under `FILES_STORAGE_PATH`
//! - Filename sanitisation (via `filestore-types`) before any path is built
//! - Startup configuration shared by the API layers
//!
//! **No API concerns**: HTTP servers, status codes and wire types belong in `api-rest` or
//! `api-shared`.

pub mod config;
pub mod constants;
mod error;
pub mod storage;

pub use config::CoreConfig;
pub use constants::DEFAULT_STORAGE_DIR;
pub use error::{FilesError, FilesResult};
pub use filestore_types::{Filename, FilenameError};
pub use storage::{FileStorageService, StoredFile};
