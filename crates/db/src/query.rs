//! Helpers shared by list queries.

use std::fmt;

use scylla_core::error::CoreError;

/// Ordering used when the caller does not ask for one.
pub const DEFAULT_ORDER: &str = "id DESC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

/// A validated `ORDER BY` list.
///
/// Column names cannot be bound as parameters, so they are checked against an
/// allow-list before being spliced into SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy {
    terms: Vec<(&'static str, Direction)>,
}

impl OrderBy {
    /// Parse `"col:dir,col:dir"`. Direction defaults to ascending; an empty or
    /// missing spec yields [`DEFAULT_ORDER`].
    pub fn parse(spec: Option<&str>, allowed: &[&'static str]) -> Result<Self, CoreError> {
        let mut terms = Vec::new();
        for part in spec.unwrap_or_default().split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (column, direction) = match part.split_once(':') {
                Some((c, d)) => (c.trim(), d.trim()),
                None => (part, "asc"),
            };
            let column = allowed
                .iter()
                .copied()
                .find(|a| a.eq_ignore_ascii_case(column))
                .ok_or_else(|| CoreError::Validation(format!("cannot sort by '{column}'")))?;
            let direction = match direction.to_ascii_lowercase().as_str() {
                "asc" => Direction::Asc,
                "desc" => Direction::Desc,
                other => {
                    return Err(CoreError::Validation(format!(
                        "sort direction must be asc or desc, got '{other}'"
                    )))
                }
            };
            terms.push((column, direction));
        }
        Ok(Self { terms })
    }

    /// The clause body, without the `ORDER BY` keyword.
    pub fn to_sql(&self) -> String {
        if self.terms.is_empty() {
            return DEFAULT_ORDER.to_string();
        }
        self.terms
            .iter()
            .map(|(column, direction)| format!("{column} {direction}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
