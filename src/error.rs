//! Error types for the lockbox decoder.
//!
//! Per-line anomalies (unknown record codes, short lines, unparsable values,
//! out-of-sequence trailers) are recovered in place and never show up here.
//! Only failures that abandon a whole file are errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abandon a decode or export as a whole.
#[derive(Debug, Error)]
pub enum LockboxError {
    /// The input bytes could not be treated as text.
    #[error("failed to parse file: input is not valid text (invalid UTF-8 at byte {offset})")]
    InvalidText { offset: usize },

    /// Reading an input file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing an export snapshot failed.
    #[error("failed to export: {0}")]
    Export(#[from] serde_json::Error),
}

impl LockboxError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::str::Utf8Error> for LockboxError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::InvalidText {
            offset: err.valid_up_to(),
        }
    }
}

/// Convenience `Result` alias using [`LockboxError`].
pub type Result<T> = std::result::Result<T, LockboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_text_message() {
        let bytes = [b'1', b'0', 0xff, b'2'];
        let err: LockboxError = std::str::from_utf8(&bytes).unwrap_err().into();
        assert!(matches!(err, LockboxError::InvalidText { offset: 2 }));
        assert_eq!(
            err.to_string(),
            "failed to parse file: input is not valid text (invalid UTF-8 at byte 2)"
        );
    }

    #[test]
    fn test_io_message_includes_path() {
        let err = LockboxError::io(
            "missing.lbx",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().starts_with("failed to read missing.lbx"));
    }
}
