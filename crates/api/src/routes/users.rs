//! Route definitions for the `/users` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /         -> list
/// POST   /         -> create
/// DELETE /batch    -> delete_batch
/// GET    /export   -> export
/// POST   /import   -> import
/// GET    /{id}     -> get_by_id
/// PATCH  /{id}     -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/batch", delete(users::delete_batch))
        .route("/export", get(users::export))
        .route("/import", post(users::import))
        .route("/{id}", get(users::get_by_id).patch(users::update))
}
