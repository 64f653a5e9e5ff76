//! Rule evaluation for a single row.

use super::report::FieldError;
use super::rules::{RuleTable, RuleTag};
use super::tracker::{Claim, UniquenessTracker};
use crate::sheet::Row;

/// Result of applying a [`RuleTable`] to one row.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RowCheck {
    /// Violations found, in column order.
    pub errors: Vec<FieldError>,
    /// `(field, value)` pairs registered in the tracker by this row; these
    /// still need the store check.
    pub claimed: Vec<(String, String)>,
}

impl RowCheck {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Apply every column's tags in order.
///
/// A `required` failure is recorded and evaluation continues; a `unique`
/// failure is recorded and ends evaluation of the row. Unique values are
/// registered in `tracker` as soon as they pass, even if a later column of
/// the same row then fails. Blank values are never registered.
pub fn evaluate_row(rules: &RuleTable, row: &Row, tracker: &UniquenessTracker) -> RowCheck {
    let mut check = RowCheck::default();

    for rule in rules.columns() {
        let value = row.cell(rule.column);
        for tag in &rule.tags {
            match tag {
                RuleTag::Required => {
                    if value.is_empty() {
                        check.errors.push(FieldError::required(&rule.field, row.number));
                    }
                }
                RuleTag::Unique => {
                    if value.is_empty() {
                        continue;
                    }
                    match tracker.claim(&rule.field, value) {
                        Claim::Fresh => check
                            .claimed
                            .push((rule.field.clone(), value.to_string())),
                        Claim::Duplicate => {
                            check
                                .errors
                                .push(FieldError::not_unique(&rule.field, value, row.number));
                            return check;
                        }
                    }
                }
            }
        }
    }

    check
}
