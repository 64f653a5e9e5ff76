//! Handlers for the `/auth` resource (register, login, logout, password reset).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use scylla_core::error::CoreError;
use scylla_db::models::password_reset::CreatePasswordReset;
use scylla_db::models::user::UserResponse;
use scylla_db::repositories::{PasswordResetRepo, RevokedTokenRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::otp::generate_otp;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::handlers::{hash, non_blank};
use crate::handlers::users::{prepare_user, UserRequest};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Draws before giving up on finding a code no live reset is using.
const MAX_OTP_DRAWS: usize = 20;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email is not a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "email is not a valid email"))]
    pub email: String,
}

/// Request body for `POST /auth/check-otp`.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckOtpRequest {
    #[validate(custom(function = "non_blank"))]
    pub otp: String,
}

/// Request body for `PATCH /auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(custom(function = "non_blank"))]
    pub otp: String,
    #[validate(length(min = 8, max = 100, message = "password must be 8 to 100 characters"))]
    pub password: String,
    #[validate(must_match(
        other = "password",
        message = "password_confirmation does not match password"
    ))]
    pub password_confirmation: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<UserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let dto = prepare_user(&state, input, None).await?;
    let user = UserRepo::create(&state.pool, &dto).await?;
    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: user.into() }),
    ))
}

/// POST /api/v1/auth/login
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<TokenResponse>>> {
    input.validate()?;

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    let token = generate_access_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(DataResponse {
        data: TokenResponse {
            token,
            token_type: "Bearer",
            expires_in: state.config.jwt.expires_in_secs(),
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Revokes the presented token for the rest of its lifetime.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    RevokedTokenRepo::revoke(&state.pool, &auth.jti, auth.expires_at).await?;
    let purged = RevokedTokenRepo::purge_expired(&state.pool).await?;
    tracing::info!(user_id = auth.user_id, purged, "User logged out");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/forgot-password
///
/// Issues a fresh reset code for `email`, replacing any earlier ones.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "User",
            key: format!("with email {}", input.email.trim()),
        })?;

    PasswordResetRepo::delete_for_email(&state.pool, &user.email).await?;

    let now = Utc::now();
    let mut otp = None;
    for _ in 0..MAX_OTP_DRAWS {
        let candidate = generate_otp();
        if !PasswordResetRepo::otp_in_use(&state.pool, &candidate, now).await? {
            otp = Some(candidate);
            break;
        }
    }
    let otp = otp.ok_or_else(|| AppError::InternalError("no free reset code".into()))?;

    PasswordResetRepo::create(
        &state.pool,
        &CreatePasswordReset {
            email: user.email.clone(),
            otp: otp.clone(),
            expires_at: now + Duration::minutes(state.config.otp_ttl_mins),
        },
    )
    .await?;
    tracing::debug!(user_id = user.id, %otp, "Issued password reset code");

    Ok(Json(MessageResponse::new("Password reset code issued")))
}

/// POST /api/v1/auth/check-otp
pub async fn check_otp(
    State(state): State<AppState>,
    Json(input): Json<CheckOtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;
    active_reset(&state, input.otp.trim()).await?;
    Ok(Json(MessageResponse::new("OTP is valid")))
}

/// PATCH /api/v1/auth/reset-password
///
/// Sets a new password for the owner of `otp` and consumes the code.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;

    let otp = input.otp.trim();
    let reset = active_reset(&state, otp).await?;

    let updated =
        UserRepo::update_password_by_email(&state.pool, &reset.email, &hash(&input.password)?)
            .await?;
    if !updated {
        return Err(CoreError::NotFound {
            entity: "User",
            key: format!("with email {}", reset.email),
        }
        .into());
    }
    PasswordResetRepo::delete_by_otp(&state.pool, otp).await?;
    tracing::info!(email = %reset.email, "Password reset");

    Ok(Json(MessageResponse::new("Password has been reset")))
}

/// The reset row behind `otp`, provided it has not expired.
async fn active_reset(
    state: &AppState,
    otp: &str,
) -> AppResult<scylla_db::models::password_reset::PasswordReset> {
    let reset = PasswordResetRepo::find_by_otp(&state.pool, otp)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "OTP",
            key: otp.to_string(),
        })?;

    if reset.is_expired(Utc::now()) {
        return Err(AppError::BadRequest("OTP has expired".into()));
    }
    Ok(reset)
}
