//! Route definitions for the `/customers` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::customers;
use crate::state::AppState;

/// Routes mounted at `/customers`.
///
/// ```text
/// GET    /         -> list
/// POST   /         -> create
/// POST   /batch    -> create_batch
/// DELETE /batch    -> delete_batch
/// GET    /export   -> export
/// POST   /import   -> import
/// GET    /{id}     -> get_by_id
/// PATCH  /{id}     -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list).post(customers::create))
        .route(
            "/batch",
            post(customers::create_batch).delete(customers::delete_batch),
        )
        .route("/export", get(customers::export))
        .route("/import", post(customers::import))
        .route("/{id}", get(customers::get_by_id).patch(customers::update))
}
