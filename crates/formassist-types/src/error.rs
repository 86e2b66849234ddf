use thiserror::Error;

use crate::operation::OperationKind;

/// Errors from calls to the assistant backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// No response arrived (connection refused, reset, DNS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status. The body is kept raw
    /// because binary endpoints return their JSON error as an octet stream.
    #[error("backend rejected request with status {status}")]
    Rejected { status: u16, body: Vec<u8> },

    /// A success response whose body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// An operation failure re-raised to the immediate caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failed: {reason}")]
pub struct OperationError {
    pub kind: OperationKind,
    pub reason: String,
}

/// Errors saving a downloaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("invalid download filename: '{0}'")]
    InvalidFilename(String),

    #[error("failed to save download: {0}")]
    Io(String),
}

/// Errors from form catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown form '{0}'")]
    UnknownForm(String),
}

/// Errors loading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("invalid config file {path}: {message}")]
    Parse { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Rejected {
            status: 503,
            body: br#"{"error":"down"}"#.to_vec(),
        };
        assert_eq!(err.to_string(), "backend rejected request with status 503");
    }

    #[test]
    fn test_operation_error_display() {
        let err = OperationError {
            kind: OperationKind::Upload,
            reason: "File type not allowed: x.exe".to_string(),
        };
        assert_eq!(err.to_string(), "upload failed: File type not allowed: x.exe");
    }

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::UnknownForm("I-999".to_string());
        assert_eq!(err.to_string(), "unknown form 'I-999'");
    }
}
