//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`otp`] -- numeric one-time codes for password resets.

pub mod jwt;
pub mod otp;
pub mod password;
