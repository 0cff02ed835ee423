//! Loading program text from disk.

use std::io::ErrorKind;
use std::path::Path;

/// File extension of Tally programs.
pub const SOURCE_EXTENSION: &str = "tly";

/// A program file that could not be read.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot find file '{0}'")]
    NotFound(String),
    #[error("permission denied reading '{0}'")]
    PermissionDenied(String),
    #[error("'{0}' contains invalid UTF-8 data")]
    InvalidUtf8(String),
    #[error("error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read `path` as UTF-8 text.
pub fn read_source(path: &str) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_string()),
        ErrorKind::PermissionDenied => LoadError::PermissionDenied(path.to_string()),
        ErrorKind::InvalidData => LoadError::InvalidUtf8(path.to_string()),
        _ => LoadError::Io {
            path: path.to_string(),
            source,
        },
    })
}

/// Whether `path` names a `.tly` file (any case).
pub fn is_source_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
}
