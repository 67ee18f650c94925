//! Validated value types shared across the file store crates.

/// Errors that can occur when validating a caller-supplied filename.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    /// The final path segment was empty
    #[error("filename is empty")]
    Empty,
    /// The final path segment begins with `.` (hidden file or `..`)
    #[error("filename must not begin with '.'")]
    Hidden,
    /// The input carried directory components
    #[error("filename must not contain path separators")]
    PathSeparator,
    /// The input contained a NUL byte
    #[error("filename must not contain NUL bytes")]
    Nul,
}

const SEPARATORS: [char; 2] = ['/', '\\'];

/// A single path segment that is safe to join onto a storage root.
///
/// Construction strips everything up to the last separator, then rejects the result if it is
/// empty, begins with `.`, or if the raw input carried any directory component at all.
/// A `Filename` therefore never contains `/`, `\` or NUL and never starts with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Filename(String);

impl Filename {
    /// Sanitises a raw, caller-supplied name.
    ///
    /// # Errors
    ///
    /// Returns a [`FilenameError`] describing why the name was rejected.
    pub fn sanitize(raw: impl AsRef<str>) -> Result<Self, FilenameError> {
        let raw = raw.as_ref();
        let base = basename(raw);

        if base.is_empty() {
            return Err(FilenameError::Empty);
        }
        if base.starts_with('.') {
            return Err(FilenameError::Hidden);
        }
        if base.len() != raw.len() {
            return Err(FilenameError::PathSeparator);
        }
        if base.contains('\0') {
            return Err(FilenameError::Nul);
        }

        Ok(Self(base.to_owned()))
    }

    /// Returns the inner name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Final segment after the last separator.
fn basename(raw: &str) -> &str {
    match raw.rfind(SEPARATORS) {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    }
}

impl std::fmt::Display for Filename {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Filename {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for Filename {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}
