//! Error types for the Pagetree core library.

use thiserror::Error;

/// All errors that can occur within the Pagetree core library.
#[derive(Debug, Error)]
pub enum PagetreeError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A project or document reference could not be resolved.
    ///
    /// This variant deliberately covers both "no such record" and "record
    /// exists under a different project": callers outside a project's scope
    /// must not be able to tell the two apart.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A move operation would make a document its own parent or create an
    /// ancestor cycle.
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// A required field was empty or malformed when creating a document.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The opened file is not a valid Pagetree store.
    #[error("Invalid store: {0}")]
    InvalidStore(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias that pins the error type to [`PagetreeError`].
pub type Result<T> = std::result::Result<T, PagetreeError>;

impl PagetreeError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::NotFound(_) => "Document not found in this project".to_string(),
            Self::InvalidMove(msg) => msg.clone(),
            Self::ValidationFailed(msg) => msg.clone(),
            Self::InvalidStore(_) => "Could not open store file".to_string(),
            Self::Io(e) => format!("File error: {e}"),
        }
    }
}
