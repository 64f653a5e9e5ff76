//! Seams between the import pipeline and its collaborators.

use async_trait::async_trait;

use super::rules::RuleTable;
use crate::sheet::Row;

/// Failure reported by an [`ImportStore`].
#[derive(Debug, thiserror::Error)]
#[error("store operation failed: {0}")]
pub struct StoreError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// An importable entity: where it lands, how its cells are checked, and how a
/// checked row becomes a record.
pub trait ImportSchema: Send + Sync + 'static {
    type Record: Send + 'static;

    /// Target table name, passed to [`ImportStore::exists_by_field`].
    fn table(&self) -> &'static str;

    fn rules(&self) -> &RuleTable;

    /// Build the record for a row that passed every check.
    ///
    /// May be CPU heavy (password hashing); the pipeline runs it on the
    /// blocking pool.
    fn materialize(&self, row: &Row) -> Result<Self::Record, String>;
}

/// Persistence used by an import run.
#[async_trait]
pub trait ImportStore<R: Send + 'static>: Send + Sync + 'static {
    /// Whether a row in `table` already has `field = value`.
    async fn exists_by_field(&self, table: &str, field: &str, value: &str)
        -> Result<bool, StoreError>;

    /// Insert every record or none of them.
    async fn insert_all(&self, records: Vec<R>) -> Result<u64, StoreError>;
}
