// /src/errors.rs
//! Recoverable errors at the edges of the crate
//!
//! The diff engine itself has no error path: a broken internal invariant
//! panics. Everything here comes from turning outside data (JSON values,
//! configuration, Python objects) into diffable rows.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcilerError {
    #[error("Key extraction failed: {details}")]
    KeyError { details: String },

    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversionError { expected: String, actual: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Python call failed: {0}")]
    PythonError(String),
}

#[cfg(feature = "python")]
mod python {
    use super::ReconcilerError;
    use pyo3::{PyErr, exceptions::PyValueError};

    impl From<ReconcilerError> for PyErr {
        fn from(err: ReconcilerError) -> Self {
            PyValueError::new_err(err.to_string())
        }
    }

    impl From<PyErr> for ReconcilerError {
        fn from(err: PyErr) -> Self {
            ReconcilerError::PythonError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = ReconcilerError::KeyError {
            details: "missing field 'id'".into(),
        };
        assert_eq!(err.to_string(), "Key extraction failed: missing field 'id'");

        let err = ReconcilerError::TypeConversionError {
            expected: "string or number".into(),
            actual: "bool".into(),
        };
        assert_eq!(
            err.to_string(),
            "Type conversion error: expected string or number, got bool"
        );
    }

    #[test]
    fn serde_errors_convert() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ReconcilerError = parse.unwrap_err().into();
        assert!(matches!(err, ReconcilerError::SerdeError(_)));
    }
}
