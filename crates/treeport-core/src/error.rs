//! Error types for export and publish operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExportError`.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while exporting or publishing a project tree.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Listing a directory of the source filesystem failed.
    #[error("cannot list directory {path}: {source}")]
    ListDirectory {
        /// Virtual path of the directory.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading a file of the source filesystem failed.
    #[error("cannot read file {path}: {source}")]
    ReadFile {
        /// Virtual path of the file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The in-memory archive could not be serialized.
    #[error("failed to serialize archive: {0}")]
    ArchiveSerialization(String),

    /// Compression level outside the supported range.
    #[error("invalid compression level {level}, must be 0-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// The save target refused to replace an existing file.
    #[error("output file already exists: {path}")]
    OutputExists {
        /// Destination that already exists.
        path: PathBuf,
    },

    /// A required configuration value is absent.
    #[error("missing configuration value: {name}")]
    MissingConfig {
        /// Name of the missing value (environment variable or field).
        name: String,
    },

    /// A configuration value is present but unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// The HTTP request never produced a response.
    #[error("{operation}: transport error: {reason}")]
    Transport {
        /// Remote operation being performed.
        operation: String,
        /// Transport-level failure description.
        reason: String,
    },

    /// The remote host answered with a non-success status.
    #[error("{operation}: {message} (HTTP {status})")]
    RemoteApi {
        /// Remote operation being performed.
        operation: String,
        /// HTTP status code.
        status: u16,
        /// The `message` field of the JSON body, or a generic message.
        message: String,
    },

    /// The remote host answered with a body we could not interpret.
    #[error("{operation}: malformed response: {reason}")]
    MalformedResponse {
        /// Remote operation being performed.
        operation: String,
        /// What was wrong with the body.
        reason: String,
    },
}

impl ExportError {
    /// Returns `true` if the error came from the remote host or the network.
    ///
    /// # Examples
    ///
    /// ```
    /// use treeport_core::ExportError;
    ///
    /// let err = ExportError::RemoteApi {
    ///     operation: "create main branch".into(),
    ///     status: 422,
    ///     message: "Reference already exists".into(),
    /// };
    /// assert!(err.is_remote());
    ///
    /// let err = ExportError::InvalidCompressionLevel { level: 12 };
    /// assert!(!err.is_remote());
    /// ```
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::RemoteApi { .. } | Self::MalformedResponse { .. }
        )
    }

    /// Returns `true` if an archive export can skip the failing entry and go
    /// on.
    ///
    /// Only per-file read failures qualify; everything else aborts.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReadFile { .. })
    }

    /// Returns the HTTP status of a remote API failure.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the path of the filesystem entry involved, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::ListDirectory { path, .. } | Self::ReadFile { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the remote operation name, if this is a remote error.
    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Transport { operation, .. }
            | Self::RemoteApi { operation, .. }
            | Self::MalformedResponse { operation, .. } => Some(operation),
            _ => None,
        }
    }
}
