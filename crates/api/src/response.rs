//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Paged listings add a
//! `meta` object next to `data`.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use scylla_core::pagination::PageMeta;
use scylla_core::sheet::SheetFormat;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "meta": {...} }` for paginated listings.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// `{ "message": "..." }` for actions with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A spreadsheet file download.
#[derive(Debug)]
pub struct SheetAttachment {
    pub filename: String,
    pub format: SheetFormat,
    pub bytes: Vec<u8>,
}

impl IntoResponse for SheetAttachment {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename={}", self.filename);
        (
            [
                (CONTENT_TYPE, self.format.content_type().to_string()),
                (CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}
