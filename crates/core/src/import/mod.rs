//! Concurrent spreadsheet import.
//!
//! A sheet is checked row by row against a [`RuleTable`](rules::RuleTable):
//! required cells, uniqueness within the sheet, then uniqueness against the
//! store. The in-sheet checks run in file order; every row that clears them
//! gets its own task for the store check and record conversion. Records are
//! buffered and written in one all-or-nothing batch, and only when no row
//! produced an error.

pub mod evaluator;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod store;
pub mod tracker;

use serde::Serialize;

pub use pipeline::{import_bytes, run_import};
pub use report::{FieldError, ValidationReport};
pub use rules::{RuleTable, RuleTag};
pub use store::{ImportSchema, ImportStore, StoreError};

use crate::sheet::SheetError;

/// Why an import did not commit.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The upload could not be parsed; no row was looked at.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// One or more rows broke a rule. Nothing was written.
    #[error("import rejected: {0}")]
    Rejected(ValidationReport),

    /// An existence check or the final insert failed. Nothing was written.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("row {row} could not be converted: {message}")]
    Materialize { row: usize, message: String },

    #[error("import failed: {0}")]
    Internal(String),
}

/// Outcome of a committed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub table: &'static str,
    /// Data rows read from the sheet.
    pub rows: usize,
    /// Records written.
    pub imported: usize,
}
