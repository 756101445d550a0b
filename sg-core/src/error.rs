//! Global error types for the Snapgram client.
//!
//! All failures are unified into a single `SgError` enum. `SgError::kind()`
//! collapses the variants into the handful of categories callers branch on:
//! a missing record is not the same thing as a dropped connection.

use thiserror::Error;

/// Convenience type alias for Results using SgError.
pub type SgResult<T> = Result<T, SgError>;

/// Unified error type covering all error categories in Snapgram.
#[derive(Error, Debug)]
pub enum SgError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Local storage errors --
    /// SQLite-backed local storage failed.
    #[error("local storage error: {0}")]
    Storage(String),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(String),

    // -- Network errors --
    /// HTTP request failed before a response was received.
    #[error("http error: {0}")]
    Http(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Backend returned a 5xx (or otherwise unexpected) error response.
    #[error("server error (status {status}, {code}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Backend error type identifier (e.g. "general_unknown").
        code: String,
        /// Error message from the backend.
        message: String,
    },

    /// No session, expired session, or insufficient permissions.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    // -- Domain errors --
    /// The requested account, document, or file does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before or by the backend.
    #[error("validation failed: {0}")]
    Validation(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Service errors --
    /// A service failed to initialize.
    #[error("service init error: {0}")]
    ServiceInit(String),

    /// A service operation failed.
    #[error("service error: {0}")]
    Service(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of an [`SgError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Absence: no account, no document, no file.
    NotFound,
    /// Bad input, caught locally or rejected by the backend (400).
    Validation,
    /// Missing or rejected session (401/403).
    Auth,
    /// The request never produced a response.
    Transport,
    /// The backend answered with an error it could not attribute to the caller.
    Server,
    /// Local configuration, storage, or serialization failure.
    Local,
}

impl SgError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::AuthFailed(_) => ErrorKind::Auth,
            Self::Http(_) | Self::Timeout(_) => ErrorKind::Transport,
            Self::ServerError { .. } => ErrorKind::Server,
            Self::Config(_)
            | Self::MissingConfig(_)
            | Self::Storage(_)
            | Self::Pool(_)
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::ServiceInit(_)
            | Self::Service(_)
            | Self::Internal(_)
            | Self::Other(_) => ErrorKind::Local,
        }
    }

    /// Whether this error means "the thing does not exist".
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Whether this error means "no usable session".
    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }
}

impl From<serde_json::Error> for SgError {
    fn from(e: serde_json::Error) -> Self {
        SgError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for SgError {
    fn from(e: toml::de::Error) -> Self {
        SgError::Config(e.to_string())
    }
}
