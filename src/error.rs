//! Error types for discovery, decoding and frame routing.
//!
//! All errors implement `std::error::Error` and carry enough structured context
//! to decide whether an operation is worth retrying.
//!
//! ## Error Categories
//!
//! - **Decode Errors**: Malformed payloads or wire types without a registered codec.
//!   Always recovered locally by the caller (the message is skipped or replaced
//!   by [`Message::Invalid`](crate::messages::Message::Invalid)).
//! - **Network Errors**: Transport query/subscribe failures and stream discovery
//!   that ended without finding a descriptor.
//! - **Unknown Type Errors**: A payload decoded fine but is not the kind of
//!   message the caller asked for.
//! - **Sink Errors**: A sink could not accept a delivered value.
//! - **Config Errors**: Invalid or unreadable configuration.
//!
//! ```rust
//! use tcnart::TcnError;
//!
//! let error = TcnError::network("failed to discover stream config");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tcnart operations.
pub type Result<T, E = TcnError> = std::result::Result<T, E>;

/// Main error type for tcnart operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TcnError {
    #[error("Failed to decode '{type_name}': {details}")]
    Decode { type_name: String, details: String },

    #[error("Failed to encode '{type_name}': {details}")]
    Encode { type_name: String, details: String },

    #[error("Network error: {reason}")]
    Network {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unexpected message type '{type_name}' (expected {expected})")]
    UnknownType { type_name: String, expected: String },

    #[error("Sink rejected delivery: {reason}")]
    Sink { reason: String },

    #[error("Invalid configuration: {details}")]
    Config { details: String },

    #[error("Config file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TcnError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TcnError::Network { .. } => true,
            TcnError::Sink { .. } => true,
            TcnError::Decode { .. } => false,
            TcnError::Encode { .. } => false,
            TcnError::UnknownType { .. } => false,
            TcnError::Config { .. } => false,
            TcnError::File { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TcnError::Decode { .. } => vec![
                "Check that the publisher and subscriber agree on the wire type name",
                "Register a codec for the type in the message registry",
                "Verify the payload was produced by a compatible schema version",
            ],
            TcnError::Encode { .. } => vec![
                "Check that the message kind matches the codec's type name",
                "Register a codec for the type in the message registry",
            ],
            TcnError::Network { .. } => vec![
                "Ensure the router or peer is reachable",
                "Check the topic prefix and key expressions",
                "Verify the sensor service is publishing its stream descriptors",
            ],
            TcnError::UnknownType { .. } => vec![
                "Check which service answers on the queried key expression",
                "Narrow the key expression to the expected service",
            ],
            TcnError::Sink { .. } => vec![
                "Keep the consumer side of the sink alive until shutdown",
                "Increase the sink channel capacity",
            ],
            TcnError::Config { .. } => vec![
                "Check the configuration values against the documented defaults",
                "Verify the YAML syntax of the configuration file",
            ],
            TcnError::File { .. } => vec![
                "Check the file exists and is readable",
                "Check file permissions",
            ],
        }
    }

    /// Helper constructor for decode errors.
    pub fn decode_failed(type_name: impl Into<String>, details: impl Into<String>) -> Self {
        TcnError::Decode { type_name: type_name.into(), details: details.into() }
    }

    /// Helper constructor for encode errors.
    pub fn encode_failed(type_name: impl Into<String>, details: impl Into<String>) -> Self {
        TcnError::Encode { type_name: type_name.into(), details: details.into() }
    }

    /// Helper constructor for network errors.
    pub fn network(reason: impl Into<String>) -> Self {
        TcnError::Network { reason: reason.into(), source: None }
    }

    /// Helper constructor for network errors with source.
    pub fn network_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TcnError::Network { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for unexpected message kinds.
    pub fn unknown_type(type_name: impl Into<String>, expected: impl Into<String>) -> Self {
        TcnError::UnknownType { type_name: type_name.into(), expected: expected.into() }
    }

    /// Helper constructor for sink errors.
    pub fn sink_closed(reason: impl Into<String>) -> Self {
        TcnError::Sink { reason: reason.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config(details: impl Into<String>) -> Self {
        TcnError::Config { details: details.into() }
    }

    /// Helper constructor for configuration file errors.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TcnError::File { path, source }
    }
}

impl From<std::io::Error> for TcnError {
    fn from(err: std::io::Error) -> Self {
        TcnError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_yaml_ng::Error> for TcnError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        TcnError::Config { details: err.to_string() }
    }
}
