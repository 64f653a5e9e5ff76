//! Repository for the `users` table.

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite};
use scylla_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};
use crate::query::OrderBy;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

/// Columns a caller may sort user listings by.
pub const SORTABLE_COLUMNS: &[&str] = &["id", "username", "email", "created_at", "updated_at"];

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    async fn insert<'e, E>(executor: E, input: &CreateUser) -> Result<User, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO users (username, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Insert a new user, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        Self::insert(pool, input).await
    }

    /// Insert every user in one transaction. On error nothing is written.
    pub async fn create_many(
        pool: &DbPool,
        inputs: &[CreateUser],
    ) -> Result<Vec<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(Self::insert(&mut *tx, input).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = ?1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether another user already owns `email`.
    ///
    /// `except_id` excludes the user being updated from the check.
    pub async fn email_taken(
        pool: &DbPool,
        email: &str,
        except_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1 AND (?2 IS NULL OR id <> ?2))",
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(pool)
        .await
    }

    /// List users matching `filter`, ordered by `order`.
    pub async fn list(
        pool: &DbPool,
        filter: &UserFilter,
        order: &OrderBy,
    ) -> Result<Vec<User>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM users WHERE 1 = 1"));
        if let Some(username) = &filter.username {
            qb.push(" AND username = ").push_bind(username.clone());
        }
        if let Some(email) = &filter.email {
            qb.push(" AND email = ").push_bind(email.clone());
        }
        if let Some(start) = filter.start_date {
            qb.push(" AND date(created_at) >= date(").push_bind(start).push(")");
        }
        if let Some(end) = filter.end_date {
            qb.push(" AND date(created_at) <= date(").push_bind(end).push(")");
        }
        qb.push(" ORDER BY ").push(order.to_sql());

        qb.build_query_as::<User>().fetch_all(pool).await
    }

    /// Replace a user's username, email, and password hash.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = ?2,
                email = ?3,
                password_hash = ?4,
                updated_at = ?5
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Update the password hash of the user owning `email`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn update_password_by_email(
        pool: &DbPool,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE email = ?1")
                .bind(email)
                .bind(password_hash)
                .bind(Utc::now())
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every user in `ids`, returning how many rows went away.
    pub async fn delete_many(pool: &DbPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM users WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}
