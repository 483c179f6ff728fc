//! Unified error type for core codecs and configuration.

use serde::{Deserialize, Serialize};

/// Error type for encoding, decoding, and configuration failures.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum CoreError {
    /// Invalid input to a codec or constructor
    #[error("Invalid: {message}")]
    Invalid {
        /// What was malformed
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Config error: {message}")]
    Config {
        /// What went wrong while loading or validating configuration
        message: String,
    },
}

impl CoreError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Standard Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
