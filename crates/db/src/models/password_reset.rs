//! Password reset (one-time code) model.

use scylla_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `password_resets` table.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: DbId,
    pub email: String,
    pub otp: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl PasswordReset {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// DTO for issuing a one-time code.
#[derive(Debug, Clone)]
pub struct CreatePasswordReset {
    pub email: String,
    pub otp: String,
    pub expires_at: Timestamp,
}
