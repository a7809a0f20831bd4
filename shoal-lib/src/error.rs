use std::error::Error;
use std::path::PathBuf;

/// Failure to construct a shared or downloaded file record.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// The referenced file could not be opened or stat'd.
    #[error("cannot access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("piece size must be positive, got {0}")]
    InvalidPieceSize(u64),
}

/// A cryptographic signature over file metadata failed to validate.
///
/// Validation is deterministic for a given (data, signature, key) triple,
/// so this is never retried automatically; the caller must reject the
/// associated file or metadata as untrusted.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct InvalidSignature {
    message: String,
    #[source]
    cause: Option<Box<dyn Error + Send + Sync>>,
}

impl InvalidSignature {
    /// The validator itself detected the invalidity, no lower-level failure
    /// to wrap.
    pub fn with_message<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Invalidity surfaced through a lower-level failure that needs context
    /// added, e.g. a malformed key or corrupt signature encoding.
    pub fn with_message_and_cause<S, E>(message: S, cause: E) -> Self
    where
        S: Into<String>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// The lower-level failure speaks for itself; the message is taken from
    /// its own description.
    pub fn with_cause<E>(cause: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let cause = cause.into();
        Self {
            message: cause.to_string(),
            cause: Some(cause),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync)> {
        self.cause.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn message_only() {
        let err = InvalidSignature::with_message("bad sig");
        assert_eq!(err.message(), "bad sig");
        assert_eq!(err.to_string(), "bad sig");
        assert!(err.cause().is_none());
        assert!(err.source().is_none());
    }

    #[test]
    fn message_and_cause() {
        let underlying = io::Error::new(io::ErrorKind::InvalidData, "truncated blob");
        let err = InvalidSignature::with_message_and_cause("bad sig", underlying);
        assert_eq!(err.message(), "bad sig");
        assert_eq!(err.cause().unwrap().to_string(), "truncated blob");
        assert_eq!(err.source().unwrap().to_string(), "truncated blob");
    }

    #[test]
    fn cause_only_derives_message() {
        let underlying = io::Error::new(io::ErrorKind::InvalidData, "corrupt key encoding");
        let err = InvalidSignature::with_cause(underlying);
        assert_eq!(err.message(), "corrupt key encoding");
        assert_eq!(err.cause().unwrap().to_string(), "corrupt key encoding");
    }

    #[test]
    fn file_error_reports_path() {
        let err = FileError::Io {
            path: "/nowhere/file.bin".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("/nowhere/file.bin"));
        assert!(matches!(err, FileError::Io { .. }));
    }
}
