//! Error types for tag evaluation

use codetags_config::ConfigError;
use thiserror::Error;

/// Result type for codetags operations
pub type CodetagsResult<T> = Result<T, CodetagsError>;

/// Codetags errors
///
/// Data-driven problems (unknown tags, malformed expressions or descriptors,
/// missing environment variables) never surface here; they degrade to
/// `false` or an empty list.
#[derive(Debug, Error)]
pub enum CodetagsError {
    /// Misuse of the registry, such as claiming the reserved default name
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Presets could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CodetagsError {
    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Check if this error is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_error() {
        let error = CodetagsError::invalid_argument("bad name");
        assert!(error.is_invalid_argument());
        assert_eq!(error.to_string(), "Invalid argument: bad name");
    }

    #[test]
    fn test_config_error_conversion() {
        let error: CodetagsError = ConfigError::ParseError("oops".to_string()).into();
        assert!(!error.is_invalid_argument());
        assert!(error.to_string().contains("oops"));
    }
}
