//! Error types for model and collection operations
//!
//! Every failure is surfaced once, immediately, to the caller. Driver errors
//! pass through untouched so their code and message stay visible.

use thiserror::Error;

/// Result type alias for model and collection operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for model and collection operations
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// No driver handle configured on the model or collection
    #[error("mysql-model: No connection")]
    NoConnection,

    /// No effective id could be resolved for a single-row operation
    #[error("mysql-model: No id passed or set")]
    NoId,

    /// The driver reported no inserted id
    #[error("mysql-model: No row inserted.")]
    NoRowInserted,

    /// The driver reported zero changed rows
    #[error("mysql-model: No rows changed.")]
    NoRowsChanged,

    /// The driver reported zero affected rows on delete
    #[error("mysql-model: No rows removed.")]
    NoRowsRemoved,

    /// Bulk save on an empty collection
    #[error("mysql-model: No models")]
    NoModels,

    /// Argument shape not accepted by the operation
    #[error("mysql-model: Invalid argument, {0}")]
    InvalidArgument(String),

    /// Single-row fetch returned no row
    #[error("Record not found in table '{0}'")]
    NotFound(String),

    /// Result rows could not be read into the expected shape
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A registered observer rejected a change notification
    #[error(transparent)]
    Event(#[from] EventError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error reported by the underlying driver, passed through as-is
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl ModelError {
    /// Whether this error came from the driver rather than the wrapper
    pub fn is_driver_error(&self) -> bool {
        matches!(self, ModelError::Driver(_))
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

impl From<sqlx::Error> for ModelError {
    fn from(err: sqlx::Error) -> Self {
        ModelError::Driver(err.into())
    }
}

/// Error reported by a driver handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    /// Driver or server specific error code, when one is known
    pub code: Option<String>,
    /// Message as reported by the driver
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for DriverError {
    fn from(err: sqlx::Error) -> Self {
        let code = err
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .map(|code| code.into_owned());

        Self {
            code,
            message: err.to_string(),
        }
    }
}

/// Error returned by model and collection observers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Observer error: {message}")]
    Observer { message: String },

    #[error("Event propagation stopped: {reason}")]
    PropagationStopped { reason: String },
}

impl EventError {
    pub fn observer(message: &str) -> Self {
        Self::Observer {
            message: message.to_string(),
        }
    }

    pub fn propagation_stopped(reason: &str) -> Self {
        Self::PropagationStopped {
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_error_messages() {
        assert_eq!(ModelError::NoConnection.to_string(), "mysql-model: No connection");
        assert_eq!(ModelError::NoId.to_string(), "mysql-model: No id passed or set");
        assert_eq!(
            ModelError::InvalidArgument("pass models.".to_string()).to_string(),
            "mysql-model: Invalid argument, pass models."
        );
    }

    #[test]
    fn test_driver_error_passes_through() {
        let driver = DriverError::with_code("1062", "Duplicate entry '1' for key 'PRIMARY'");
        let error: ModelError = driver.clone().into();

        assert!(error.is_driver_error());
        assert_eq!(error.to_string(), "Duplicate entry '1' for key 'PRIMARY'");
        match error {
            ModelError::Driver(inner) => assert_eq!(inner, driver),
            other => panic!("Expected driver error, got {:?}", other),
        }
    }

    #[test]
    fn test_event_error_conversion() {
        let error: ModelError = EventError::observer("listener failed").into();
        assert!(matches!(error, ModelError::Event(EventError::Observer { .. })));
        assert!(error.to_string().contains("listener failed"));
    }
}
