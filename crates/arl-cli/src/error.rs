//! Error types for arl-cli

use basket_arl::BasketError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Bad input data (CSV rows, timestamps, columns)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bad configuration or thresholds
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound(_) => ExitCode::from(3),
            Self::InvalidInput(_) => ExitCode::from(4),
            Self::InvalidConfig(_) => ExitCode::from(5),
            Self::Io(_) => ExitCode::from(7),
            Self::Serialization(_) => ExitCode::from(8),
        }
    }
}

impl From<BasketError> for CliError {
    fn from(e: BasketError) -> Self {
        match e {
            BasketError::Io(io) => Self::Io(io),
            config @ (BasketError::InvalidHyperparameter { .. }
            | BasketError::UnknownMetric(_)
            | BasketError::Config(_)) => Self::InvalidConfig(config.to_string()),
            other => Self::InvalidInput(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "x");
        let codes: Vec<String> = [
            CliError::FileNotFound(PathBuf::from("x")),
            CliError::InvalidInput(String::new()),
            CliError::InvalidConfig(String::new()),
            CliError::Io(io),
        ]
        .iter()
        .map(|e| format!("{:?}", e.exit_code()))
        .collect();
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_from_basket_error() {
        let err: CliError = BasketError::UnknownMetric("zhang".to_string()).into();
        assert!(matches!(err, CliError::InvalidConfig(_)));

        let err: CliError = BasketError::invalid_row(2, "ServiceId", "is empty").into();
        assert!(matches!(err, CliError::InvalidInput(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CliError = BasketError::Io(io).into();
        assert!(matches!(err, CliError::Io(_)));
    }
}
