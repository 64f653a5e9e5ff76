//! Request handlers, one submodule per resource.
//!
//! Handlers validate input, delegate to the repositories in `scylla_db` or
//! the import pipeline in `scylla_core`, and map errors via [`AppError`].
//! The helpers below are shared by the user and customer handlers.

pub mod auth;
pub mod customers;
pub mod users;

use axum::body::Bytes;
use axum::extract::Multipart;
use chrono::Utc;
use scylla_core::sheet::{write_sheet, SheetFormat};
use scylla_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::response::SheetAttachment;

/// Multipart field carrying an import upload.
pub const UPLOAD_FIELD: &str = "file";

/// Request body for batch deletes: `{ "id": [1, 2, 3] }`.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteBatchRequest {
    #[validate(
        length(min = 1, message = "id must list at least one id"),
        custom(function = "positive_ids")
    )]
    pub id: Vec<DbId>,
}

/// Query parameters for export endpoints: `?format=xlsx` (default) or `csv`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: SheetFormat,
}

/// Outcome of a batch delete.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

fn positive_ids(ids: &[DbId]) -> Result<(), ValidationError> {
    if ids.iter().all(|&id| id > 0) {
        Ok(())
    } else {
        let mut error = ValidationError::new("positive");
        error.message = Some("id must contain only positive ids".into());
        Err(error)
    }
}

/// Reject values that are empty once surrounding whitespace is removed.
pub(crate) fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// Hash a plaintext password, mapping failures to a 500.
pub(crate) fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// Pull the bytes of the [`UPLOAD_FIELD`] part out of a multipart body.
pub(crate) async fn read_upload(mut multipart: Multipart) -> AppResult<Bytes> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()));
        }
    }
    Err(AppError::BadRequest(format!(
        "multipart field '{UPLOAD_FIELD}' is required"
    )))
}

/// Calendar day used in exported sheets.
pub(crate) fn export_date(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Render `rows` as a downloadable `<entity>_<timestamp>.<ext>`.
pub(crate) fn sheet_export(
    entity: &str,
    format: SheetFormat,
    header: &[&str],
    rows: Vec<Vec<String>>,
) -> AppResult<SheetAttachment> {
    let count = rows.len();
    let bytes = write_sheet(format, header, rows)
        .map_err(|e| AppError::InternalError(format!("Sheet export failed: {e}")))?;
    let filename = format!(
        "{entity}_{}.{}",
        Utc::now().format("%Y-%m-%d_%H%M%S"),
        format.extension()
    );
    tracing::info!(entity, ?format, rows = count, "Exported sheet");

    Ok(SheetAttachment {
        filename,
        format,
        bytes,
    })
}
