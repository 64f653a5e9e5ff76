//! Row structs and DTOs, one module per table.

pub mod customer;
pub mod password_reset;
pub mod user;
