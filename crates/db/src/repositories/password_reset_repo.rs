//! Repository for the `password_resets` table.

use chrono::Utc;
use scylla_core::types::Timestamp;

use crate::models::password_reset::{CreatePasswordReset, PasswordReset};
use crate::DbPool;

const COLUMNS: &str = "id, email, otp, expires_at, created_at";

/// Provides storage for one-time password reset codes.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Store a freshly issued code.
    pub async fn create(
        pool: &DbPool,
        input: &CreatePasswordReset,
    ) -> Result<PasswordReset, sqlx::Error> {
        let query = format!(
            "INSERT INTO password_resets (email, otp, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(&input.email)
            .bind(&input.otp)
            .bind(input.expires_at)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Most recent reset row carrying `otp`, expired or not.
    pub async fn find_by_otp(
        pool: &DbPool,
        otp: &str,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM password_resets WHERE otp = ?1 ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(otp)
            .fetch_optional(pool)
            .await
    }

    /// Whether an unexpired code equal to `otp` is outstanding.
    pub async fn otp_in_use(pool: &DbPool, otp: &str, now: Timestamp) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM password_resets WHERE otp = ?1 AND expires_at > ?2)",
        )
        .bind(otp)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Drop every code issued to `email`. Returns the number removed.
    pub async fn delete_for_email(pool: &DbPool, email: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM password_resets WHERE email = ?1")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Drop every row carrying `otp`. Returns the number removed.
    pub async fn delete_by_otp(pool: &DbPool, otp: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM password_resets WHERE otp = ?1")
            .bind(otp)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
