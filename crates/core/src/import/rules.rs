//! Column rule tables.
//!
//! A [`RuleTable`] maps sheet column positions to a field name and the
//! ordered checks applied to that column's cell. Tables are built once per
//! importable entity and only read during a run.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A single per-cell check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTag {
    /// The trimmed cell must not be empty.
    Required,
    /// The value must not repeat within the sheet nor exist in the store.
    Unique,
}

impl FromStr for RuleTag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "required" => Ok(Self::Required),
            "unique" => Ok(Self::Unique),
            other => Err(CoreError::Validation(format!("unknown rule tag '{other}'"))),
        }
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::Unique => f.write_str("unique"),
        }
    }
}

/// Rules for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRule {
    pub column: usize,
    pub field: String,
    pub tags: Vec<RuleTag>,
}

impl ColumnRule {
    pub fn has(&self, tag: RuleTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Ordered set of column rules, sorted by column index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    columns: Vec<ColumnRule>,
}

impl RuleTable {
    /// Build a table from `(column, "field,tag,tag")` specs.
    ///
    /// ```
    /// use scylla_core::import::rules::{RuleTable, RuleTag};
    ///
    /// let table = RuleTable::from_specs(&[(0, "username,required"), (1, "email,required,unique")])
    ///     .unwrap();
    /// assert_eq!(table.unique_fields().collect::<Vec<_>>(), vec!["email"]);
    /// assert!(table.columns()[0].has(RuleTag::Required));
    /// ```
    pub fn from_specs(specs: &[(usize, &str)]) -> Result<Self, CoreError> {
        let mut columns = Vec::with_capacity(specs.len());
        for &(column, spec) in specs {
            let mut parts = spec.split(',');
            let field = parts
                .next()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .ok_or_else(|| {
                    CoreError::Validation(format!("column {column} has no field name"))
                })?;
            let tags = parts
                .filter(|p| !p.trim().is_empty())
                .map(RuleTag::from_str)
                .collect::<Result<Vec<_>, _>>()?;
            columns.push(ColumnRule {
                column,
                field: field.to_string(),
                tags,
            });
        }
        columns.sort_by_key(|c| c.column);
        if let Some(pair) = columns.windows(2).find(|w| w[0].column == w[1].column) {
            return Err(CoreError::Validation(format!(
                "column {} is ruled twice",
                pair[0].column
            )));
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnRule] {
        &self.columns
    }

    /// Field names carrying the `unique` tag, in column order.
    pub fn unique_fields(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.has(RuleTag::Unique))
            .map(|c| c.field.as_str())
    }
}
