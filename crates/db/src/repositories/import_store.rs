//! SQL-backed [`ImportStore`] for spreadsheet imports.

use async_trait::async_trait;
use scylla_core::import::{ImportStore, StoreError};

use crate::models::customer::CreateCustomer;
use crate::models::user::CreateUser;
use crate::repositories::{CustomerRepo, UserRepo};
use crate::DbPool;

/// `(table, column)` pairs an import may probe for existing values.
///
/// Identifiers are spliced into SQL, so anything else is refused.
const LOOKUP_COLUMNS: &[(&str, &str)] = &[
    ("users", "email"),
    ("users", "username"),
    ("customers", "email"),
    ("customers", "username"),
    ("customers", "phone"),
];

/// Import persistence over the shared pool.
#[derive(Debug, Clone)]
pub struct SqlImportStore {
    pool: DbPool,
}

impl SqlImportStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, table: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        let (table, field) = LOOKUP_COLUMNS
            .iter()
            .copied()
            .find(|&(t, f)| t == table && f == field)
            .ok_or_else(|| StoreError::new(format!("no uniqueness lookup for {table}.{field}")))?;

        let query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {field} = ?1)");
        sqlx::query_scalar::<_, bool>(&query)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::new)
    }
}

#[async_trait]
impl ImportStore<CreateUser> for SqlImportStore {
    async fn exists_by_field(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<bool, StoreError> {
        self.exists(table, field, value).await
    }

    async fn insert_all(&self, records: Vec<CreateUser>) -> Result<u64, StoreError> {
        let created = UserRepo::create_many(&self.pool, &records)
            .await
            .map_err(StoreError::new)?;
        tracing::debug!(count = created.len(), "Inserted imported users");
        Ok(created.len() as u64)
    }
}

#[async_trait]
impl ImportStore<CreateCustomer> for SqlImportStore {
    async fn exists_by_field(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<bool, StoreError> {
        self.exists(table, field, value).await
    }

    async fn insert_all(&self, records: Vec<CreateCustomer>) -> Result<u64, StoreError> {
        let created = CustomerRepo::create_many(&self.pool, &records)
            .await
            .map_err(StoreError::new)?;
        tracing::debug!(count = created.len(), "Inserted imported customers");
        Ok(created.len() as u64)
    }
}
