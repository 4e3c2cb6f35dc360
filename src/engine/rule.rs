use crate::engine::error::{MapperError, Result};
use crate::engine::validators::{SharedValidator, Validator, ValidatorResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Expected scalar type of a field value
///
/// Deserialization goes through [`FromStr`], so names are case-insensitive
/// and accept the same aliases everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Integer,
    /// Any JSON number, including integers
    Float,
    Boolean,
}

impl FieldType {
    /// Check whether a value has this type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::Text => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Float => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
        }
    }

    /// Only text values carry a length
    pub fn has_length(&self) -> bool {
        matches!(self, FieldType::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "string" | "str" => Ok(FieldType::Text),
            "integer" | "int" => Ok(FieldType::Integer),
            "float" | "number" => Ok(FieldType::Float),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            other => Err(MapperError::configuration(format!(
                "Unsupported field type: {other}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Validation contract for one schema field
///
/// A new rule requires both the key and a non-empty value. Use
/// [`FieldRule::optional`] to allow the key to be missing and the value to be
/// empty, or [`FieldRule::value_required`] to relax only the value.
#[derive(Clone)]
pub struct FieldRule {
    field_type: FieldType,
    max_length: Option<usize>,
    field_required: bool,
    value_required: bool,
    validator: Option<SharedValidator>,
}

impl FieldRule {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            max_length: None,
            field_required: true,
            value_required: true,
            validator: None,
        }
    }

    pub fn text() -> Self {
        Self::new(FieldType::Text)
    }

    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    pub fn float() -> Self {
        Self::new(FieldType::Float)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn field_required(mut self, required: bool) -> Self {
        self.field_required = required;
        self
    }

    pub fn value_required(mut self, required: bool) -> Self {
        self.value_required = required;
        self
    }

    /// Key may be absent and value may be empty
    pub fn optional(self) -> Self {
        self.field_required(false).value_required(false)
    }

    /// Legacy single-flag form: `required` sets both flags at once
    pub fn required(self, required: bool) -> Self {
        self.field_required(required).value_required(required)
    }

    pub fn validator<V>(mut self, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn shared_validator(mut self, validator: SharedValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_length
    }

    pub fn is_field_required(&self) -> bool {
        self.field_required
    }

    pub fn is_value_required(&self) -> bool {
        self.value_required
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Run the custom validator, if any
    ///
    /// Returns None when the rule has no validator.
    pub fn run_validator(&self, value: &Value) -> Option<ValidatorResult> {
        self.validator.as_ref().map(|v| v.validate(value))
    }

    /// Reject contradictory or unsupported settings for the named field
    pub fn check(&self, field: &str) -> Result<()> {
        if let Some(max_length) = self.max_length {
            if max_length == 0 {
                return Err(MapperError::configuration(format!(
                    "Field '{field}': max_length must be greater than zero"
                )));
            }
            if !self.field_type.has_length() {
                return Err(MapperError::configuration(format!(
                    "Field '{field}': max_length is only supported for text fields, not {}",
                    self.field_type
                )));
            }
        }

        if self.value_required && !self.field_required {
            return Err(MapperError::configuration(format!(
                "Field '{field}': value_required requires field_required"
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("field_type", &self.field_type)
            .field("max_length", &self.max_length)
            .field("field_required", &self.field_required)
            .field("value_required", &self.value_required)
            .field("validator", &self.validator.as_ref().map(|v| v.name()))
            .finish()
    }
}
