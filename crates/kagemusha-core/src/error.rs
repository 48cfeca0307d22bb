//! Error types for kagemusha.

use thiserror::Error;

/// The error type for kagemusha operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A behavior name resolved nowhere along a delegation chain.
    #[error("unknown behavior: {name}")]
    UnknownBehavior {
        /// Name that failed to resolve.
        name: String,
    },

    /// No metadata is attached under the requested key.
    #[error("no metadata under `{key}`")]
    MetadataMissing {
        /// Key that was read.
        key: String,
    },

    /// A metadata value did not hold the requested type.
    #[error("metadata under `{key}` is not a {expected}")]
    MetadataType {
        /// Key that was read.
        key: String,
        /// Rust type the caller asked for.
        expected: &'static str,
    },
}

impl Error {
    /// Create an `UnknownBehavior` error.
    pub fn unknown_behavior(name: impl Into<String>) -> Self {
        Self::UnknownBehavior { name: name.into() }
    }
}

/// Result type alias using kagemusha's Error.
pub type Result<T> = std::result::Result<T, Error>;
