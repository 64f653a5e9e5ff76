//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&DbPool` as the first argument.

pub mod customer_repo;
pub mod import_store;
pub mod password_reset_repo;
pub mod revoked_token_repo;
pub mod user_repo;

pub use customer_repo::CustomerRepo;
pub use import_store::SqlImportStore;
pub use password_reset_repo::PasswordResetRepo;
pub use revoked_token_repo::RevokedTokenRepo;
pub use user_repo::UserRepo;
