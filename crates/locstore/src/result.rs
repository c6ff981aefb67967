//! Result and error types for locstore.

use thiserror::Error;

/// Result type for locstore operations
pub type LocStoreResult<T> = Result<T, LocStoreError>;

/// Errors that can occur in locstore
///
/// Loading an object store never returns one of these: file and control
/// failures are reported as [`crate::Diagnostic`]s instead. These errors come
/// from the pure builder, from lookups against a loaded store, and from
/// configuration.
#[derive(Debug, Error)]
pub enum LocStoreError {
    /// A search record had no usable locator value
    #[error("Invalid selector value: {value:?}")]
    InvalidSelectorValue {
        /// The offending value (empty when absent)
        value: String,
    },

    /// Required keys were not present in the store
    #[error("Missing required locators from object store: {}", keys.join(", "))]
    MissingLocators {
        /// Every missing key, in the order requested
        keys: Vec<String>,
    },

    /// A single key lookup failed
    #[error("No locator named {key:?} in object store")]
    UnknownLocator {
        /// Key that was looked up
        key: String,
    },

    /// A named store set is not defined in the configuration
    #[error("Unknown store set: {name}")]
    UnknownStoreSet {
        /// Requested set name
        name: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Object store is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl LocStoreError {
    /// Create an invalid selector value error
    #[must_use]
    pub fn invalid_value(value: impl Into<String>) -> Self {
        Self::InvalidSelectorValue {
            value: value.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
