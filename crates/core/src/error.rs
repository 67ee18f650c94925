use filestore_types::{Filename, FilenameError};

/// Errors produced by the storage operations.
///
/// The first four variants are classified precisely; any other I/O problem is collapsed into
/// `StorageFailure` carrying the underlying message.
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    #[error("filename is required")]
    MissingField,
    #[error("invalid filename: {0}")]
    InvalidName(#[from] FilenameError),
    #[error("file \"{0}\" not found")]
    NotFound(Filename),
    #[error("file \"{0}\" contains binary data and cannot be displayed as text")]
    NotText(Filename),
    #[error("{0}")]
    StorageFailure(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type FilesResult<T> = std::result::Result<T, FilesError>;
