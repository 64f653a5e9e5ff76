//! Route definitions for the `/auth` resource.

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST  /register         -> register
/// POST  /login            -> login
/// POST  /forgot-password  -> forgot_password
/// POST  /check-otp        -> check_otp
/// PATCH /reset-password   -> reset_password
/// POST  /logout           -> logout (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/check-otp", post(auth::check_otp))
        .route("/reset-password", patch(auth::reset_password))
        .route("/logout", post(auth::logout))
}
