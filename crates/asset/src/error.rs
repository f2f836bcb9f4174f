//! Error type shared by the OBJ and MTL readers.

use std::path::PathBuf;

use thiserror::Error;

pub type AssetResult<T> = Result<T, AssetError>;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while reading lines from an opened file or reader.
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A token that should be a number is not one.
    #[error("malformed {what} on line {line}: '{content}'")]
    MalformedNumber {
        line: usize,
        content: String,
        what: &'static str,
    },

    /// A directive is missing one of its values (e.g. `v 1 2`).
    #[error("missing {what} on line {line}: '{content}'")]
    MissingValue {
        line: usize,
        content: String,
        what: &'static str,
    },

    /// Face references a vertex that was never declared.
    #[error("face on line {line} references vertex {index} but only {vertex_count} exist")]
    IndexOutOfBounds {
        line: usize,
        index: u64,
        vertex_count: usize,
    },

    /// More vertices than fit in a `u32` index buffer.
    #[error("too many vertices for u32 indices ({count})")]
    TooManyVertices { count: usize },
}

impl AssetError {
    /// Map an `std::io::Error` raised while opening `path`.
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AssetError::FileNotFound { path }
        } else {
            AssetError::Io { path, source }
        }
    }

    /// 1-based line number the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            AssetError::Read { line, .. }
            | AssetError::MalformedNumber { line, .. }
            | AssetError::MissingValue { line, .. }
            | AssetError::IndexOutOfBounds { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetError::FileNotFound { .. })
    }
}
