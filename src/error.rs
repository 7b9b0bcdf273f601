//! Error types for basket-arl operations.
//!
//! Every stage of the pipeline fails fast: errors are returned to the caller
//! and nothing is retried.

use thiserror::Error;

/// Main error type for basket-arl operations.
///
/// # Examples
///
/// ```
/// use basket_arl::error::BasketError;
///
/// let err = BasketError::InvalidTimestamp {
///     line: 3,
///     value: "yesterday".to_string(),
/// };
/// assert!(err.to_string().contains("line 3"));
/// ```
#[derive(Error, Debug)]
pub enum BasketError {
    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected a record.
    #[error("CSV error at line {line}: {message}")]
    Csv {
        /// 1-based line number (header is line 1)
        line: u64,
        /// Reader message
        message: String,
    },

    /// A required column is absent from the header.
    #[error("Missing column '{column}' (available: {available})")]
    MissingColumn {
        /// Required column name
        column: String,
        /// Comma-separated header as read
        available: String,
    },

    /// A row is missing a field needed to build keys.
    #[error("Invalid row at line {line}: field '{field}' {reason}")]
    InvalidRow {
        /// 1-based line number
        line: u64,
        /// Offending column
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A `CreateDate` value could not be parsed.
    #[error("Invalid timestamp at line {line}: '{value}'")]
    InvalidTimestamp {
        /// 1-based line number
        line: u64,
        /// Raw value
        value: String,
    },

    /// Invalid hyperparameter value provided.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Rule metric name not recognised.
    #[error("Unknown rule metric '{0}' (expected support, confidence, lift, leverage or conviction)")]
    UnknownMetric(String),

    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input contained nothing to work with.
    #[error("empty input: {0}")]
    EmptyInput(String),
}

impl BasketError {
    /// Create an invalid row error.
    #[must_use]
    pub fn invalid_row(line: u64, field: &str, reason: &str) -> Self {
        Self::InvalidRow {
            line,
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid hyperparameter error.
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl ToString, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput(context.to_string())
    }
}

impl From<csv::Error> for BasketError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, csv::Position::line);
        Self::Csv {
            line,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BasketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, BasketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_row_display() {
        let err = BasketError::invalid_row(7, "ServiceId", "is empty");
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("ServiceId"));
        assert!(msg.contains("is empty"));
    }

    #[test]
    fn test_invalid_timestamp_display() {
        let err = BasketError::InvalidTimestamp {
            line: 2,
            value: "2017-13-45".to_string(),
        };
        assert!(err.to_string().contains("2017-13-45"));
    }

    #[test]
    fn test_missing_column_display() {
        let err = BasketError::MissingColumn {
            column: "CreateDate".to_string(),
            available: "UserId,ServiceId".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("CreateDate"));
        assert!(msg.contains("UserId,ServiceId"));
    }

    #[test]
    fn test_invalid_hyperparameter_helper() {
        let err = BasketError::invalid_hyperparameter("min_support", 1.5, "in (0, 1]");
        let msg = err.to_string();
        assert!(msg.contains("min_support = 1.5"));
        assert!(msg.contains("(0, 1]"));
    }

    #[test]
    fn test_unknown_metric_display() {
        let err = BasketError::UnknownMetric("zhang".to_string());
        assert!(err.to_string().contains("zhang"));
    }

    #[test]
    fn test_empty_input_helper() {
        let err = BasketError::empty_input("transaction log");
        assert_eq!(err.to_string(), "empty input: transaction log");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BasketError = io_err.into();
        assert!(matches!(err, BasketError::Io(_)));
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = BasketError::Io(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: BasketError = json_err.into();
        assert!(matches!(err, BasketError::Config(_)));
    }
}
