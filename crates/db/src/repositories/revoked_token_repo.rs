//! Repository for the `revoked_tokens` table (logout blacklist).

use chrono::Utc;
use scylla_core::types::Timestamp;

use crate::DbPool;

/// Tracks access tokens invalidated before their natural expiry.
pub struct RevokedTokenRepo;

impl RevokedTokenRepo {
    /// Record `jti` as revoked until `expires_at`. Revoking twice is a no-op.
    pub async fn revoke(pool: &DbPool, jti: &str, expires_at: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO revoked_tokens (jti, expires_at) VALUES (?1, ?2) ON CONFLICT (jti) DO NOTHING")
            .bind(jti)
            .bind(expires_at)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn is_revoked(pool: &DbPool, jti: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = ?1)")
            .bind(jti)
            .fetch_one(pool)
            .await
    }

    /// Forget revocations whose tokens have expired anyway.
    pub async fn purge_expired(pool: &DbPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= ?1")
            .bind(Utc::now())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
