//! Error types shared across the Rostra crates.

/// Errors that can occur across the Rostra directory engine.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Snapshot fetch or parse failure.
    ///
    /// Callers of the snapshot loader never see this variant; the loader
    /// degrades to the fallback dataset. It exists for the inner fetch
    /// path and its tests.
    #[error("Load error: {message}")]
    Load {
        /// What went wrong while fetching or parsing the snapshot.
        message: String,
    },

    /// Authentication or authorization failure.
    ///
    /// The message is deliberately generic for login failures so callers
    /// never learn which of username/password was wrong.
    #[error("Authentication error: {message}")]
    Auth {
        /// Human-readable, non-specific message.
        message: String,
    },

    /// Malformed or rejected input.
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation.
        field: Option<String>,
        /// What went wrong.
        message: String,
    },

    /// An operation referenced a worker id that is not in the merged view.
    #[error("Worker not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: u32,
    },

    /// Local persistence failure (write refused, quota, permissions).
    ///
    /// Surfaced to the operator but never fatal to the in-memory session.
    #[error("Storage error: {message}")]
    Storage {
        /// What the store was doing when it failed.
        message: String,
        /// Source error if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type alias for Rostra operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new load error.
    pub fn load<S: Into<String>>(message: S) -> Self {
        Error::Load {
            message: message.into(),
        }
    }

    /// Creates a new authentication error.
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Error::Auth {
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new not-found error for a worker id.
    pub fn not_found(id: u32) -> Self {
        Error::NotFound { id }
    }

    /// Creates a new storage error with a message.
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Error::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new storage error with a message and source error.
    pub fn storage_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns whether this error is caused by operator input rather than
    /// the environment.
    ///
    /// Input errors are surfaced inline next to the offending field or as
    /// a notification; environment errors (load, storage, I/O) are logged
    /// and recovered where the contract allows.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Auth { .. } | Error::Validation { .. } | Error::NotFound { .. }
        )
    }
}
