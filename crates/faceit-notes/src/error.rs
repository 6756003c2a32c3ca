//! Error types for faceit-notes.
//!
//! Every fallible operation in the library returns [`Error`]. The variants map
//! onto the situations a user can actually run into: a bad matchroom link, the
//! Faceit API being unreachable or unhappy, a match record that doesn't look
//! the way we expect, or local files that can't be read or written.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for faceit-notes operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    /// The search input was empty or whitespace only.
    #[error("please enter a Faceit matchroom link")]
    EmptyMatchUrl,

    /// The matchroom link has no path segment to use as a match id.
    #[error("no match id found in matchroom link: {url}")]
    InvalidMatchUrl {
        /// The link as entered.
        url: String,
    },

    // === Remote API Errors ===
    /// No API key was configured.
    #[error("no Faceit API key configured (set API_KEY or api.api_key)")]
    MissingApiKey,

    /// The HTTP request could not be completed.
    #[error("failed to fetch match details: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not finish within the configured timeout.
    #[error("operation timed out: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
    },

    /// The API answered with a non-success status.
    #[error("failed to fetch match details: HTTP {status} from {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// The match record is missing fields the roster needs.
    #[error("invalid match data format: {reason}")]
    MalformedMatch {
        /// Which part of the record was missing or malformed.
        reason: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the notes database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    Database(#[from] rusqlite::Error),

    /// A store's lock was poisoned by a panicking writer.
    #[error("{store} lock poisoned")]
    LockPoisoned {
        /// Which store's lock.
        store: &'static str,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for faceit-notes operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a malformed match record error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMatch {
            reason: reason.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Whether this error should be shown as a warning rather than a failure.
    ///
    /// Only an empty search input qualifies: nothing was attempted.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyMatchUrl)
    }

    /// Check if this error came from talking to the remote API.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Timeout { .. } | Self::Status { .. }
        )
    }
}
