//! Error types for the converter shells.
//!
//! The conversion itself cannot fail. Everything here belongs to the
//! boundary around it:
//!
//! - [`SourceError`] - opening and decoding a source file
//! - [`SaveError`] - writing the converted output
//! - [`PipelineError`] - open/decode/convert orchestration
//! - [`SessionError`] - operations on the current session
//! - [`ServerError`] - HTTP shell errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while opening a source file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No usable file was chosen (empty path or a directory).
    #[error("File not defined")]
    NotSelected,

    /// The chosen file does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded as text.
    #[error("Failed to decode source: {0}")]
    Encoding(String),
}

// =============================================================================
// Save Errors
// =============================================================================

/// Errors while saving converted output.
#[derive(Debug, Error)]
pub enum SaveError {
    /// There is no converted output yet.
    #[error("Open file first")]
    NothingToSave,

    /// Writing the destination failed.
    #[error("Not saved: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Pipeline Errors
// =============================================================================

/// Open/decode/convert orchestration errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source could not be opened.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

// =============================================================================
// Session Errors
// =============================================================================

/// Errors from [`crate::session::Session`] operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Opening a new source failed; the session is unchanged.
    #[error("{0}")]
    Open(#[from] PipelineError),

    /// Saving the current output failed.
    #[error("{0}")]
    Save(#[from] SaveError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Bind or serve failure.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // SourceError -> PipelineError -> SessionError
        let source_err = SourceError::NotSelected;
        let pipeline_err: PipelineError = source_err.into();
        assert!(pipeline_err.to_string().contains("File not defined"));

        let session_err: SessionError = pipeline_err.into();
        assert!(matches!(session_err, SessionError::Open(_)));

        // SaveError -> SessionError
        let session_err: SessionError = SaveError::NothingToSave.into();
        assert_eq!(session_err.to_string(), "Open file first");
    }

    #[test]
    fn test_save_error_format() {
        let err = SaveError::Io {
            path: PathBuf::from("/readonly/output.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Not saved"));
        assert!(msg.contains("output.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_not_found_mentions_path() {
        let err = SourceError::NotFound(PathBuf::from("lines.txt"));
        assert!(err.to_string().contains("lines.txt"));
    }
}
