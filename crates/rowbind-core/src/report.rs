//! Batch validation reporting.
//!
//! [`BatchReport`] folds the outcome of validating many records into row
//! counts plus a flat list of [`RowIssue`]s, each attributing one
//! validation message to a field on a 1-indexed row.

use serde::{Deserialize, Serialize};

use rowbind_model::FieldError;

use crate::record::Record;

/// One validation message attributed to a field on a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    /// 1-indexed row in the source the record was bound from.
    pub line: u64,
    /// Field the message belongs to.
    pub field: String,
    /// Validator message, e.g. `"cost higher than max_value"`.
    pub message: String,
}

/// Validation outcome of a batch of records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    record_type: String,
    rows_seen: u64,
    rows_invalid: u64,
    issues: Vec<RowIssue>,
}

impl BatchReport {
    /// Empty report for the named record type.
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            rows_seen: 0,
            rows_invalid: 0,
            issues: Vec::new(),
        }
    }

    /// Validates `record` and folds the outcome into the report.
    ///
    /// Returns whether the record passed, or the decode or configuration
    /// error that kept validation from running.
    pub fn observe(&mut self, record: &mut Record) -> Result<bool, FieldError> {
        self.rows_seen += 1;
        let valid = record.is_valid()?;
        if !valid {
            self.rows_invalid += 1;
            let line = record.line();
            for (field, message) in record.field_messages() {
                self.issues.push(RowIssue {
                    line,
                    field: field.to_owned(),
                    message: message.to_owned(),
                });
            }
        }
        Ok(valid)
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    pub fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    pub fn rows_invalid(&self) -> u64 {
        self.rows_invalid
    }

    pub fn issues(&self) -> &[RowIssue] {
        &self.issues
    }

    pub fn error_count(&self) -> usize {
        self.issues.len()
    }

    /// Whether every observed record passed validation.
    pub fn is_clean(&self) -> bool {
        self.rows_invalid == 0
    }
}
