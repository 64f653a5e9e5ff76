pub mod auth;
pub mod customers;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                   register (public)
/// /auth/login                      login (public)
/// /auth/forgot-password            issue reset code (public)
/// /auth/check-otp                  verify reset code (public)
/// /auth/reset-password             set new password (public, PATCH)
/// /auth/logout                     revoke token (requires auth)
///
/// /users                           list, create
/// /users/batch                     batch delete (DELETE)
/// /users/export                    xlsx or CSV download
/// /users/import                    xlsx or CSV upload (multipart)
/// /users/{id}                      get, update (PATCH)
///
/// /customers                       list (paged), create
/// /customers/batch                 batch create (POST), batch delete (DELETE)
/// /customers/export                xlsx or CSV download
/// /customers/import                xlsx or CSV upload (multipart)
/// /customers/{id}                  get, update (PATCH)
/// ```
///
/// Everything outside `/auth` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/customers", customers::router())
}
