use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for the field mapper
///
/// Only fatal conditions are represented here. Per-field validation failures
/// are collected as [`FieldError`] entries in a batch result and never abort
/// processing.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapperError {
    /// Invalid rule, rename table or schema definition
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A custom validator failed for reasons other than rejecting the value
    #[error("Validator execution error for field '{field}' in record {record_index}: {message}")]
    ValidatorExecution {
        field: String,
        record_index: usize,
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl MapperError {
    /// Creates a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        MapperError::Configuration(message.into())
    }

    /// Convert from serde_json::Error
    pub fn from_serde(err: serde_json::Error) -> Self {
        MapperError::Deserialization(err.to_string())
    }

    /// Prefix a configuration error with the field it concerns
    pub fn for_field(self, field: &str) -> Self {
        match self {
            MapperError::Configuration(message) => {
                MapperError::Configuration(format!("Field '{field}': {message}"))
            }
            other => other,
        }
    }

    /// Returns true for errors raised while building a mapper
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MapperError::Configuration(_) | MapperError::Deserialization(_)
        )
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        MapperError::from_serde(err)
    }
}

/// Type alias for Result with MapperError
pub type Result<T> = std::result::Result<T, MapperError>;

/// Why a field of a record was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    MissingField,
    MissingValue,
    TypeMismatch,
    LengthExceeded,
    CustomValidationFailed,
}

impl ErrorReason {
    /// Stable snake_case code for this reason
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorReason::MissingField => "missing_field",
            ErrorReason::MissingValue => "missing_value",
            ErrorReason::TypeMismatch => "type_mismatch",
            ErrorReason::LengthExceeded => "length_exceeded",
            ErrorReason::CustomValidationFailed => "custom_validation_failed",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a batch error log, scoped to a single (record, field) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Position of the offending record in the input batch
    pub record_index: usize,

    /// Schema name of the field (before renaming)
    pub field: String,

    pub reason: ErrorReason,

    /// Optional human-readable detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldError {
    pub fn new(record_index: usize, field: impl Into<String>, reason: ErrorReason) -> Self {
        Self {
            record_index,
            field: field.into(),
            reason,
            message: None,
        }
    }

    /// Attach a detail message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {}, field '{}': {}",
            self.record_index, self.field, self.reason
        )?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors() {
        assert!(MapperError::configuration("bad rule").is_configuration());
        assert!(MapperError::Deserialization("bad json".to_string()).is_configuration());
        assert!(
            !MapperError::ValidatorExecution {
                field: "email".to_string(),
                record_index: 3,
                message: "boom".to_string(),
            }
            .is_configuration()
        );
    }

    #[test]
    fn test_for_field_prefixes_configuration_errors() {
        let err = MapperError::configuration("Unsupported field type: date").for_field("born");
        assert_eq!(
            err.to_string(),
            "Configuration error: Field 'born': Unsupported field type: date"
        );

        let untouched = MapperError::Deserialization("eof".to_string()).for_field("born");
        assert_eq!(untouched, MapperError::Deserialization("eof".to_string()));
    }

    #[test]
    fn test_serde_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let converted: MapperError = err.into();
        assert!(matches!(converted, MapperError::Deserialization(_)));
    }

    #[test]
    fn test_validator_execution_display() {
        let err = MapperError::ValidatorExecution {
            field: "email".to_string(),
            record_index: 2,
            message: "lookup table missing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Validator execution error for field 'email' in record 2: lookup table missing"
        );
    }

    #[test]
    fn test_field_error_display() {
        let plain = FieldError::new(1, "name", ErrorReason::MissingField);
        assert_eq!(plain.to_string(), "record 1, field 'name': missing_field");

        let detailed = FieldError::new(0, "name", ErrorReason::LengthExceeded)
            .with_message("length 60 exceeds maximum of 50");
        assert_eq!(
            detailed.to_string(),
            "record 0, field 'name': length_exceeded: length 60 exceeds maximum of 50"
        );
    }

    #[test]
    fn test_reason_serializes_as_snake_case() {
        let error = FieldError::new(4, "email", ErrorReason::CustomValidationFailed);
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["reason"], "custom_validation_failed");
        assert!(json.get("message").is_none());

        let back: FieldError = serde_json::from_value(json).unwrap();
        assert_eq!(back, error);
    }
}
