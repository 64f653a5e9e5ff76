//! Per-field error aggregation for an import run.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// One rule violation on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn required(field: &str, row: usize) -> Self {
        Self {
            field: field.to_string(),
            message: format!("{field} row {row} is required"),
        }
    }

    pub fn not_unique(field: &str, value: &str, row: usize) -> Self {
        Self {
            field: field.to_string(),
            message: format!("{field} '{value}' is not unique row {row}"),
        }
    }

    pub fn already_taken(field: &str, value: &str, row: usize) -> Self {
        Self {
            field: field.to_string(),
            message: format!("{field} '{value}' already taken row {row}"),
        }
    }
}

/// Field name → error messages, in sheet row order.
///
/// Built after every row task has finished, from each task's own error list,
/// so no locking is involved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors
            .entry(error.field)
            .or_default()
            .push(error.message);
    }

    pub fn extend<I: IntoIterator<Item = FieldError>>(&mut self, errors: I) {
        for error in errors {
            self.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self
            .errors
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}
