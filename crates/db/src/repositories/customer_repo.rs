//! Repository for the `customers` table.

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite};
use scylla_core::pagination::PageRequest;
use scylla_core::types::DbId;

use crate::models::customer::{CreateCustomer, Customer, CustomerFilter, UpdateCustomer};
use crate::query::OrderBy;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, phone, address, created_at, updated_at";

/// Columns a caller may sort customer listings by.
pub const SORTABLE_COLUMNS: &[&str] = &[
    "id",
    "username",
    "email",
    "phone",
    "address",
    "created_at",
    "updated_at",
];

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

/// Append the `WHERE` conditions for `filter`.
fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a CustomerFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(username) = &filter.username {
        qb.push(" AND username LIKE ").push_bind(format!("%{username}%"));
    }
    if let Some(email) = &filter.email {
        qb.push(" AND email LIKE ").push_bind(format!("%{email}%"));
    }
    if let Some(start) = filter.start_date {
        qb.push(" AND date(created_at) >= date(").push_bind(start).push(")");
    }
    if let Some(end) = filter.end_date {
        qb.push(" AND date(created_at) <= date(").push_bind(end).push(")");
    }
}

impl CustomerRepo {
    async fn insert<'e, E>(executor: E, input: &CreateCustomer) -> Result<Customer, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "INSERT INTO customers (username, email, phone, address, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    /// Insert a new customer, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        Self::insert(pool, input).await
    }

    /// Insert every customer in one transaction. On error nothing is written.
    pub async fn create_many(
        pool: &DbPool,
        inputs: &[CreateCustomer],
    ) -> Result<Vec<Customer>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(Self::insert(&mut *tx, input).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Find a customer by internal ID.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = ?1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether another customer already owns `email`.
    pub async fn email_taken(
        pool: &DbPool,
        email: &str,
        except_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE email = ?1 AND (?2 IS NULL OR id <> ?2))",
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(pool)
        .await
    }

    /// Count customers matching `filter`, ignoring paging.
    pub async fn count(pool: &DbPool, filter: &CustomerFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM customers");
        push_filters(&mut qb, filter);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// One page of customers matching `filter`, plus the unpaged total.
    pub async fn list_page(
        pool: &DbPool,
        filter: &CustomerFilter,
        order: &OrderBy,
        page: PageRequest,
    ) -> Result<(Vec<Customer>, i64), sqlx::Error> {
        let total = Self::count(pool, filter).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM customers"));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY ")
            .push(order.to_sql())
            .push(" LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = qb.build_query_as::<Customer>().fetch_all(pool).await?;
        Ok((rows, total))
    }

    /// Every customer matching `filter`, ignoring paging.
    pub async fn list_all(
        pool: &DbPool,
        filter: &CustomerFilter,
        order: &OrderBy,
    ) -> Result<Vec<Customer>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM customers"));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY ").push(order.to_sql());
        qb.build_query_as::<Customer>().fetch_all(pool).await
    }

    /// Replace every editable field of a customer.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET
                username = ?2,
                email = ?3,
                phone = ?4,
                address = ?5,
                updated_at = ?6
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete every customer in `ids`, returning how many rows went away.
    pub async fn delete_many(pool: &DbPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM customers WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}
