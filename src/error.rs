//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Read operations never produce one of these; absence and expiry are
/// reported through `Option`/`bool` results instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key has no entry in the cache
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Source and destination of a rename/copy are the same key
    #[error("The new key can not be the same as the old one: {0}")]
    SameKey(String),

    /// Destination of a rename/copy is already occupied
    #[error("A key with the new name already exists: {0}")]
    KeyCollision(String),

    /// A reclamation loop is already attached to this cache
    #[error("Reclamation loop is already running")]
    ReclamationRunning,

    /// Reclamation was requested with a zero interval
    #[error("Reclamation interval must be greater than zero")]
    InvalidInterval,

    /// Background reclamation needs a Tokio runtime and none is active
    #[error("No Tokio runtime available to run the reclamation loop")]
    NoRuntime,

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::InvalidConfig(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_key() {
        assert_eq!(
            CacheError::KeyNotFound("a".to_string()).to_string(),
            "Key not found: a"
        );
        assert!(CacheError::KeyCollision("b".to_string())
            .to_string()
            .contains('b'));
    }

    #[test]
    fn test_json_error_becomes_invalid_config() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: CacheError = err.into();
        assert!(matches!(converted, CacheError::InvalidConfig(_)));
    }
}
