//! Error types for feature resolution and administration.

use thiserror::Error;

/// Result type for feature operations.
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Feature errors.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Feature declarations are malformed or conflict with each other.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The storage backend could not complete the operation.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A caller-supplied argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No feature is declared under this identifier.
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}

impl FeatureError {
    /// Check if this error came from the storage backend.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}

impl From<toml::de::Error> for FeatureError {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidConfiguration(format!("TOML parse error: {}", err))
    }
}

impl From<serde_json::Error> for FeatureError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfiguration(format!("JSON parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FeatureError::BackendUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Backend unavailable: connection refused");
        assert!(err.is_backend_error());

        let err = FeatureError::UnknownFeature("beta_api".to_string());
        assert!(err.to_string().contains("beta_api"));
        assert!(!err.is_backend_error());
    }

    #[test]
    fn test_from_toml_error() {
        let parse: Result<toml::Value, _> = toml::from_str("default = ");
        let err: FeatureError = parse.unwrap_err().into();
        assert!(matches!(err, FeatureError::InvalidConfiguration(_)));
    }
}
