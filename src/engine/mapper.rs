//! # Mapper Engine Module
//!
//! Evaluates batches of records against a [`RuleSet`], renames the fields of
//! accepted records and collects a structured error log.
//!
//! Each record is checked independently. For every rule, in rule-set order:
//!
//! 1. A missing key is a `missing_field` error when the field is required
//!    (or when optional presence is enforced); otherwise the field is skipped
//! 2. An empty value is a `missing_value` error when the value is required;
//!    otherwise the field is skipped
//! 3. A value of the wrong type is a `type_mismatch` error and ends the checks
//!    for that field
//! 4. Text longer than `max_length` is a `length_exceeded` error
//! 5. The custom validator, if any, runs last
//!
//! A record with no errors is renamed and accepted. Keys that have no rule are
//! dropped from the output.

use crate::engine::error::{ErrorReason, FieldError, MapperError, Result};
use crate::engine::result::{ProcessResult, Record};
use crate::engine::rule::FieldRule;
use crate::engine::schema::{RenameMap, RuleSet};
use crate::engine::utils::{is_empty_value, json_type_name, text_length};
use crate::engine::validators::{ValidatorError, ValidatorRegistry};
use log::{debug, info, warn};
use serde_json::Value;

/// Schema-driven validator and field mapper
///
/// Configuration is validated once at construction and is immutable
/// afterwards. `process` keeps no state between calls, so one mapper can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Mapper {
    rules: RuleSet,
    rename_map: RenameMap,
    enforce_optional_presence: bool,
}

/// Builder for [`Mapper`]
#[derive(Debug, Clone)]
pub struct MapperBuilder {
    rules: RuleSet,
    rename_map: RenameMap,
    enforce_optional_presence: bool,
}

impl MapperBuilder {
    pub fn rename_map(mut self, rename_map: RenameMap) -> Self {
        self.rename_map = rename_map;
        self
    }

    /// Require every field's key to be present, even for optional fields
    ///
    /// Optional fields may still carry an empty value.
    pub fn enforce_optional_presence(mut self, enforce: bool) -> Self {
        self.enforce_optional_presence = enforce;
        self
    }

    pub fn build(self) -> Result<Mapper> {
        self.rename_map.check(&self.rules)?;
        debug!(
            "Built mapper with {} rules, {} renames, enforce_optional_presence={}",
            self.rules.len(),
            self.rename_map.len(),
            self.enforce_optional_presence
        );
        Ok(Mapper {
            rules: self.rules,
            rename_map: self.rename_map,
            enforce_optional_presence: self.enforce_optional_presence,
        })
    }
}

impl Mapper {
    pub fn builder(rules: RuleSet) -> MapperBuilder {
        MapperBuilder {
            rules,
            rename_map: RenameMap::new(),
            enforce_optional_presence: false,
        }
    }

    /// Mapper that validates without renaming
    pub fn new(rules: RuleSet) -> Result<Self> {
        Self::builder(rules).build()
    }

    pub fn with_rename_map(rules: RuleSet, rename_map: RenameMap) -> Result<Self> {
        Self::builder(rules).rename_map(rename_map).build()
    }

    /// Build a mapper from a JSON schema definition
    ///
    /// See [`crate::SchemaDefinition`] for the format.
    pub fn from_json(json: &str, registry: &ValidatorRegistry) -> Result<Self> {
        crate::engine::definition::SchemaDefinition::from_json(json)?.build(registry)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rename_map(&self) -> &RenameMap {
        &self.rename_map
    }

    pub fn enforces_optional_presence(&self) -> bool {
        self.enforce_optional_presence
    }

    /// Validate and rename a batch of records
    ///
    /// Invalid records never abort the batch; they are left out of the output
    /// and described in the error log. The call fails only when a custom
    /// validator reports a fault.
    pub fn process(&self, records: &[Record]) -> Result<ProcessResult> {
        let mut accepted = Vec::new();
        let mut errors = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let record_errors = self.validate(index, record)?;
            if record_errors.is_empty() {
                debug!("Record {} accepted", index);
                accepted.push(self.rename(record));
            } else {
                debug!(
                    "Record {} rejected with {} error(s)",
                    index,
                    record_errors.len()
                );
                errors.extend(record_errors);
            }
        }

        let result = ProcessResult::new(records.len(), accepted, errors);
        info!(
            "Batch {} processed: {} total, {} accepted, {} rejected",
            result.batch_id,
            result.total,
            result.accepted_count(),
            result.rejected_count()
        );
        Ok(result)
    }

    /// Check one record against every rule
    ///
    /// Returns the record's field errors; an empty list means the record is
    /// valid. `index` is the record's position in its batch.
    pub fn validate(&self, index: usize, record: &Record) -> Result<Vec<FieldError>> {
        let mut errors = Vec::new();
        for (field, rule) in self.rules.iter() {
            self.check_field(index, field, rule, record.get(field), &mut errors)?;
        }
        Ok(errors)
    }

    fn check_field(
        &self,
        index: usize,
        field: &str,
        rule: &FieldRule,
        value: Option<&Value>,
        errors: &mut Vec<FieldError>,
    ) -> Result<()> {
        let value = match value {
            Some(value) => value,
            None => {
                if rule.is_field_required() || self.enforce_optional_presence {
                    debug!("Record {}: missing field '{}'", index, field);
                    errors.push(FieldError::new(index, field, ErrorReason::MissingField));
                }
                return Ok(());
            }
        };

        if is_empty_value(value) {
            if rule.is_value_required() {
                debug!("Record {}: missing value for '{}'", index, field);
                errors.push(FieldError::new(index, field, ErrorReason::MissingValue));
            }
            return Ok(());
        }

        let expected = rule.field_type();
        if !expected.matches(value) {
            debug!(
                "Record {}: '{}' expected {}, got {}",
                index,
                field,
                expected,
                json_type_name(value)
            );
            errors.push(
                FieldError::new(index, field, ErrorReason::TypeMismatch).with_message(format!(
                    "expected {}, got {}",
                    expected,
                    json_type_name(value)
                )),
            );
            return Ok(());
        }

        if let (Some(max_length), Some(length)) = (rule.max_len(), text_length(value)) {
            if length > max_length {
                debug!(
                    "Record {}: '{}' length {} exceeds {}",
                    index, field, length, max_length
                );
                errors.push(
                    FieldError::new(index, field, ErrorReason::LengthExceeded).with_message(
                        format!("length {length} exceeds maximum of {max_length}"),
                    ),
                );
            }
        }

        match rule.run_validator(value) {
            None | Some(Ok(true)) => {}
            Some(Ok(false)) => {
                debug!("Record {}: custom validation failed for '{}'", index, field);
                errors.push(FieldError::new(
                    index,
                    field,
                    ErrorReason::CustomValidationFailed,
                ));
            }
            Some(Err(ValidatorError::Rejected(message))) => {
                debug!(
                    "Record {}: custom validation failed for '{}': {}",
                    index, field, message
                );
                errors.push(
                    FieldError::new(index, field, ErrorReason::CustomValidationFailed)
                        .with_message(message),
                );
            }
            Some(Err(ValidatorError::Fault(message))) => {
                warn!(
                    "Validator for field '{}' failed on record {}: {}",
                    field, index, message
                );
                return Err(MapperError::ValidatorExecution {
                    field: field.to_string(),
                    record_index: index,
                    message,
                });
            }
        }

        Ok(())
    }

    /// Project a valid record onto the rule set and apply output names
    ///
    /// Output keys follow rule-set order. Absent optional fields stay absent.
    pub fn rename(&self, record: &Record) -> Record {
        self.rules
            .field_names()
            .filter_map(|field| {
                record.get(field).map(|value| {
                    (
                        self.rename_map.output_name(field).to_string(),
                        value.clone(),
                    )
                })
            })
            .collect()
    }
}
