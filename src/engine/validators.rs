//! # Custom Validators Module
//!
//! Custom validators attach semantic checks to a field rule. A validator can
//! answer in three ways:
//!
//! - `Ok(true)`: the value is accepted
//! - `Ok(false)` or `Err(ValidatorError::Rejected(..))`: the value is invalid and
//!   the record is rejected with `custom_validation_failed`
//! - `Err(ValidatorError::Fault(..))`: the validator itself is broken; the whole
//!   batch is aborted with [`MapperError::ValidatorExecution`]
//!
//! Validators can be plain closures, implementations of [`Validator`], or
//! built-ins referenced by name from a schema definition.

use crate::engine::error::{MapperError, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure signalled by a validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    /// The value is semantically invalid
    #[error("rejected: {0}")]
    Rejected(String),
    /// The validator could not run (a defect, not a verdict on the value)
    #[error("fault: {0}")]
    Fault(String),
}

impl ValidatorError {
    pub fn rejected(message: impl Into<String>) -> Self {
        ValidatorError::Rejected(message.into())
    }

    pub fn fault(message: impl Into<String>) -> Self {
        ValidatorError::Fault(message.into())
    }
}

pub type ValidatorResult = std::result::Result<bool, ValidatorError>;

/// Semantic check applied to a field value after its type and length checks
///
/// Implementations must be thread-safe so a mapper can be shared freely.
pub trait Validator: Send + Sync {
    /// Check a single, non-empty value of the expected type
    fn validate(&self, value: &Value) -> ValidatorResult;

    /// Name used in diagnostics
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Validator for F
where
    F: Fn(&Value) -> ValidatorResult + Send + Sync,
{
    fn validate(&self, value: &Value) -> ValidatorResult {
        self(value)
    }
}

/// Shared handle to a validator
pub type SharedValidator = Arc<dyn Validator>;

/// Named boolean check
pub struct Predicate<F> {
    name: String,
    check: F,
}

impl<F> Validator for Predicate<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn validate(&self, value: &Value) -> ValidatorResult {
        Ok((self.check)(value))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a plain boolean check as a named validator
pub fn predicate<F>(name: impl Into<String>, check: F) -> Predicate<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    Predicate {
        name: name.into(),
        check,
    }
}

/// Reference to a validator inside a schema definition
///
/// Either a bare name (`"email"`) or a name with input
/// (`{"name": "pattern", "input": {"regex": "^[A-Z]+$"}}`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ValidatorConfig {
    Named(String),
    WithInput {
        name: String,
        #[serde(default)]
        input: Value,
    },
}

impl ValidatorConfig {
    pub fn name(&self) -> &str {
        match self {
            ValidatorConfig::Named(name) => name,
            ValidatorConfig::WithInput { name, .. } => name,
        }
    }

    pub fn input(&self) -> &Value {
        static NO_INPUT: Value = Value::Null;
        match self {
            ValidatorConfig::Named(_) => &NO_INPUT,
            ValidatorConfig::WithInput { input, .. } => input,
        }
    }
}

// Built-in validators available by name in schema definitions
pub mod builtins {
    use super::*;

    pub const EMAIL: &str = "email";
    pub const NOT_BLANK: &str = "not_blank";
    pub const DIGITS: &str = "digits";
    pub const PATTERN: &str = "pattern";
    pub const ONE_OF: &str = "one_of";

    /// Local part, a single `@`, and a dotted domain with no empty labels
    fn looks_like_email(s: &str) -> bool {
        if s.chars().any(char::is_whitespace) {
            return false;
        }
        match s.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && domain.split('.').all(|label| !label.is_empty())
            }
            None => false,
        }
    }

    /// Names of all built-in validators
    pub fn names() -> [&'static str; 5] {
        [EMAIL, NOT_BLANK, DIGITS, PATTERN, ONE_OF]
    }

    /// Build a built-in validator from its configuration
    ///
    /// Returns Ok(None) when the name is not a built-in.
    pub fn build(config: &ValidatorConfig) -> Result<Option<SharedValidator>> {
        let validator: SharedValidator = match config.name() {
            EMAIL => Arc::new(predicate(EMAIL, |v| {
                v.as_str().is_some_and(looks_like_email)
            })),
            NOT_BLANK => Arc::new(predicate(NOT_BLANK, |v| {
                v.as_str().is_some_and(|s| !s.trim().is_empty())
            })),
            DIGITS => Arc::new(predicate(DIGITS, |v| {
                v.as_str()
                    .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
            })),
            PATTERN => Arc::new(PatternValidator::from_input(config.input())?),
            ONE_OF => Arc::new(OneOfValidator::from_input(config.input())?),
            _ => return Ok(None),
        };
        Ok(Some(validator))
    }
}

/// Accepts text values matching a regular expression
#[derive(Debug, Clone)]
pub struct PatternValidator {
    regex: Regex,
}

impl PatternValidator {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            MapperError::configuration(format!("Invalid regex '{pattern}' for pattern validator: {e}"))
        })?;
        Ok(Self { regex })
    }

    pub fn from_input(input: &Value) -> Result<Self> {
        let pattern = input.get("regex").and_then(Value::as_str).ok_or_else(|| {
            MapperError::configuration("Missing 'regex' in pattern validator input")
        })?;
        Self::new(pattern)
    }
}

impl Validator for PatternValidator {
    fn validate(&self, value: &Value) -> ValidatorResult {
        match value.as_str() {
            Some(s) if self.regex.is_match(s) => Ok(true),
            Some(_) => Err(ValidatorError::rejected(format!(
                "value does not match pattern '{}'",
                self.regex.as_str()
            ))),
            None => Ok(false),
        }
    }

    fn name(&self) -> &str {
        builtins::PATTERN
    }
}

/// Accepts values equal to one of a fixed set
#[derive(Debug, Clone)]
pub struct OneOfValidator {
    values: Vec<Value>,
}

impl OneOfValidator {
    pub fn new(values: Vec<Value>) -> Result<Self> {
        if values.is_empty() {
            return Err(MapperError::configuration(
                "one_of validator requires at least one allowed value",
            ));
        }
        Ok(Self { values })
    }

    pub fn from_input(input: &Value) -> Result<Self> {
        let values = input
            .get("values")
            .and_then(Value::as_array)
            .ok_or_else(|| MapperError::configuration("Missing 'values' array in one_of validator input"))?;
        Self::new(values.clone())
    }
}

impl Validator for OneOfValidator {
    fn validate(&self, value: &Value) -> ValidatorResult {
        Ok(self.values.contains(value))
    }

    fn name(&self) -> &str {
        builtins::ONE_OF
    }
}

/// Named validators supplied by the embedding application
///
/// Registered names take precedence over built-ins of the same name.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, SharedValidator>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<V>(&mut self, name: impl Into<String>, validator: V)
    where
        V: Validator + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    /// Builder-style registration
    pub fn with<V>(mut self, name: impl Into<String>, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.register(name, validator);
        self
    }

    pub fn get(&self, name: &str) -> Option<&SharedValidator> {
        self.validators.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Resolve a validator reference from a schema definition
    pub fn resolve(&self, config: &ValidatorConfig) -> Result<SharedValidator> {
        if let Some(validator) = self.get(config.name()) {
            return Ok(Arc::clone(validator));
        }
        builtins::build(config)?.ok_or_else(|| {
            MapperError::configuration(format!(
                "Unknown validator '{}' (built-ins: {})",
                config.name(),
                builtins::names().join(", ")
            ))
        })
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("ValidatorRegistry")
            .field("validators", &names)
            .finish()
    }
}
