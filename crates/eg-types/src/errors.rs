use thiserror::Error;

/// Main error type for the Equigrid system
#[derive(Error, Debug)]
pub enum EgError {
    #[error("Timer is not yet started")]
    NotStarted,

    #[error("Reserved key conflict: metadata must not contain '{key}'")]
    ReservedKeyConflict { key: String },

    #[error("Cannot resample: no total runtime or time precision provided")]
    MissingResampleConfig,

    #[error("Invalid resample configuration: {0}")]
    InvalidResampleConfig(String),

    #[error("Corrupt run log at line {line}: {message}")]
    Corrupt { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for Equigrid operations
pub type EgResult<T> = Result<T, EgError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::EgError::Config(format!($($arg)*))
    };
}

/// Macro for creating invalid resample configuration errors
#[macro_export]
macro_rules! resample_error {
    ($($arg:tt)*) => {
        $crate::EgError::InvalidResampleConfig(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EgError::ReservedKeyConflict {
            key: "eval".to_string(),
        };

        assert!(error.to_string().contains("Reserved key"));
        assert!(error.to_string().contains("eval"));

        let error = EgError::Corrupt {
            line: 7,
            message: "expected value".to_string(),
        };
        assert!(error.to_string().contains("line 7"));
    }

    #[test]
    fn test_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let eg_error: EgError = io_error.into();

        match eg_error {
            EgError::Io(_) => (),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_macros() {
        let config_err = config_error!("Missing required field: {}", "output_dir");
        assert!(matches!(config_err, EgError::Config(_)));

        let resample_err = resample_error!("precision must be positive, got {}", 0.0);
        assert!(resample_err.to_string().contains("precision"));
    }
}
