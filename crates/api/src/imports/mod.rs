//! Spreadsheet schemas for the entities that can be bulk imported.
//!
//! Each schema fixes the column layout of its sheet, the rules applied to
//! every cell, and how an accepted row becomes an insert DTO.

pub mod customers;
pub mod users;

pub use customers::CustomerSheet;
pub use users::UserSheet;
