//! Domain logic for the scylla backend: shared types, errors, pagination,
//! spreadsheet I/O, and the concurrent import pipeline.
//!
//! Nothing in this crate touches the database or HTTP.

pub mod error;
pub mod import;
pub mod pagination;
pub mod sheet;
pub mod types;
