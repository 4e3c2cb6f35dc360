use crate::engine::error::FieldError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A single input or output record
pub type Record = Map<String, Value>;

/// Outcome of processing one batch
///
/// Accepted records and the full error log travel together, so a caller can
/// use the clean subset of a batch and still report on every rejected record.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    /// Identifier of this run, for correlating log lines and reports
    pub batch_id: String,
    pub processed_at: DateTime<Utc>,
    /// Number of records in the input batch
    pub total: usize,
    /// Accepted records, renamed, in input order
    pub records: Vec<Record>,
    /// Every field error of the batch, ordered by record then by rule
    pub errors: Vec<FieldError>,
}

/// Counts for a processed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl ProcessResult {
    pub(crate) fn new(total: usize, records: Vec<Record>, errors: Vec<FieldError>) -> Self {
        Self {
            batch_id: Uuid::now_v7().to_string(),
            processed_at: Utc::now(),
            total,
            records,
            errors,
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.records.len()
    }

    /// Number of distinct records with at least one error
    pub fn rejected_count(&self) -> usize {
        self.rejected_indices().len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors reported for one input record
    pub fn errors_for(&self, record_index: usize) -> Vec<&FieldError> {
        self.errors
            .iter()
            .filter(|e| e.record_index == record_index)
            .collect()
    }

    /// Input positions of rejected records, ascending
    pub fn rejected_indices(&self) -> Vec<usize> {
        self.errors
            .iter()
            .map(|e| e.record_index)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.total,
            accepted: self.accepted_count(),
            rejected: self.rejected_count(),
        }
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorReason;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_result_accessors() {
        let result = ProcessResult::new(
            3,
            vec![record(json!({"name": "Alice"}))],
            vec![
                FieldError::new(1, "name", ErrorReason::MissingField),
                FieldError::new(2, "name", ErrorReason::TypeMismatch),
                FieldError::new(2, "email", ErrorReason::CustomValidationFailed),
            ],
        );

        assert_eq!(result.accepted_count(), 1);
        assert_eq!(result.rejected_count(), 2);
        assert!(result.has_errors());
        assert_eq!(result.errors_for(2).len(), 2);
        assert!(result.errors_for(0).is_empty());
        assert_eq!(result.rejected_indices(), vec![1, 2]);
        assert_eq!(
            result.summary(),
            BatchSummary {
                total: 3,
                accepted: 1,
                rejected: 2
            }
        );
    }

    #[test]
    fn test_rejected_count_after_records_edited() {
        let mut result = ProcessResult::new(
            1,
            vec![record(json!({"name": "Alice"}))],
            vec![FieldError::new(0, "name", ErrorReason::LengthExceeded)],
        );
        // Public fields may be changed after processing
        result.records.push(record(json!({"name": "Bob"})));
        result.records.push(record(json!({"name": "Carol"})));

        assert_eq!(result.accepted_count(), 3);
        assert_eq!(result.rejected_count(), 1);
        let summary = result.summary();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.rejected, 1);
    }

    #[test]
    fn test_batch_ids_are_unique() {
        let first = ProcessResult::new(0, vec![], vec![]);
        let second = ProcessResult::new(0, vec![], vec![]);
        assert_ne!(first.batch_id, second.batch_id);
        assert!(!first.has_errors());
    }

    #[test]
    fn test_result_serializes() {
        let result = ProcessResult::new(
            1,
            vec![],
            vec![FieldError::new(0, "name", ErrorReason::MissingField)],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["errors"][0]["reason"], "missing_field");
        assert!(json["batch_id"].is_string());
    }
}
