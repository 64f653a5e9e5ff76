//! Customer entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use scylla_core::pagination::PageRequest;
use scylla_core::types::{DbId, Timestamp};

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomer {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// DTO for a full customer update.
pub type UpdateCustomer = CreateCustomer;

/// Query filters for listing and exporting customers.
///
/// `username` and `email` are substring matches. Paging applies unless
/// `all` is set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerFilter {
    pub username: Option<String>,
    pub email: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `column:direction` pairs, comma separated.
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub all: bool,
}

impl CustomerFilter {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
