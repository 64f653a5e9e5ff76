use std::sync::Arc;

use scylla_core::error::CoreError;
use scylla_db::repositories::SqlImportStore;

use crate::config::ServerConfig;
use crate::imports::{CustomerSheet, UserSheet};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: scylla_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Import persistence over `pool`.
    pub import_store: Arc<SqlImportStore>,
    /// Schema for user spreadsheets.
    pub user_sheet: Arc<UserSheet>,
    /// Schema for customer spreadsheets.
    pub customer_sheet: Arc<CustomerSheet>,
}

impl AppState {
    pub fn new(pool: scylla_db::DbPool, config: ServerConfig) -> Result<Self, CoreError> {
        Ok(Self {
            import_store: Arc::new(SqlImportStore::new(pool.clone())),
            user_sheet: Arc::new(UserSheet::new()?),
            customer_sheet: Arc::new(CustomerSheet::new()?),
            config: Arc::new(config),
            pool,
        })
    }
}
