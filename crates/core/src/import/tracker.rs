//! Intra-sheet uniqueness tracking shared by concurrent row tasks.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use super::rules::RuleTable;

/// Outcome of claiming a value for a unique field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// First occurrence; the value is now registered.
    Fresh,
    /// The value was already registered by an earlier row.
    Duplicate,
}

/// Values seen so far for every `unique` field of a run.
///
/// Check-and-register is a single critical section, so two rows presenting
/// the same value can never both observe [`Claim::Fresh`].
#[derive(Debug, Default)]
pub struct UniquenessTracker {
    seen: Mutex<HashMap<String, HashSet<String>>>,
}

impl UniquenessTracker {
    /// One empty set per `unique` field in `rules`.
    pub fn for_rules(rules: &RuleTable) -> Self {
        let seen = rules
            .unique_fields()
            .map(|field| (field.to_string(), HashSet::new()))
            .collect();
        Self {
            seen: Mutex::new(seen),
        }
    }

    /// Register `value` for `field` unless it is already present.
    pub fn claim(&self, field: &str, value: &str) -> Claim {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let values = seen.entry(field.to_string()).or_default();
        if values.insert(value.to_string()) {
            Claim::Fresh
        } else {
            Claim::Duplicate
        }
    }

    /// Number of distinct values registered for `field`.
    pub fn count(&self, field: &str) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(field)
            .map_or(0, HashSet::len)
    }
}
