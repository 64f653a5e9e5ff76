//! Handlers for the `/users` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use scylla_core::error::CoreError;
use scylla_core::import::{import_bytes, ImportSummary};
use scylla_core::types::DbId;
use scylla_db::models::user::{CreateUser, UpdateUser, UserFilter, UserResponse};
use scylla_db::query::OrderBy;
use scylla_db::repositories::user_repo::SORTABLE_COLUMNS;
use scylla_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{
    export_date, hash, non_blank, read_upload, sheet_export, DeleteBatchRequest, DeletedResponse,
    ExportParams,
};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, SheetAttachment};
use crate::state::AppState;

/// Columns of an exported user sheet.
const EXPORT_HEADER: &[&str] = &["ID", "Username", "Email", "CreatedAt", "UpdatedAt"];

/// Request body for creating, registering, or replacing a user.
#[derive(Debug, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(
        custom(function = "non_blank"),
        length(max = 200, message = "username must be at most 200 characters")
    )]
    pub username: String,
    #[validate(email(message = "email is not a valid email"))]
    pub email: String,
    #[validate(length(min = 8, max = 100, message = "password must be 8 to 100 characters"))]
    pub password: String,
}

fn email_taken_error() -> AppError {
    AppError::field("email", "unique", "email has already been taken")
}

/// Validate `input`, check its email is free for `except_id`, and hash its password.
pub(crate) async fn prepare_user(
    state: &AppState,
    input: UserRequest,
    except_id: Option<DbId>,
) -> AppResult<CreateUser> {
    input.validate()?;

    let email = input.email.trim().to_string();
    if UserRepo::email_taken(&state.pool, &email, except_id).await? {
        return Err(email_taken_error());
    }

    Ok(CreateUser {
        username: input.username.trim().to_string(),
        email,
        password_hash: hash(&input.password)?,
    })
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<UserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let dto = prepare_user(&state, input, None).await?;
    let user = UserRepo::create(&state.pool, &dto).await?;
    tracing::info!(user_id = user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: user.into() }),
    ))
}

/// GET /api/v1/users
///
/// Exact `username`/`email` matches, inclusive `start_date`/`end_date`, and
/// `sort=col:dir,...`.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filter): Query<UserFilter>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let order = OrderBy::parse(filter.sort.as_deref(), SORTABLE_COLUMNS)?;
    let users = UserRepo::list(&state.pool, &filter, &order).await?;

    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id))?;

    Ok(Json(DataResponse { data: user.into() }))
}

/// PATCH /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let dto = prepare_user(&state, input, Some(id)).await?;
    let update = UpdateUser {
        username: dto.username,
        email: dto.email,
        password_hash: dto.password_hash,
    };

    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id))?;
    tracing::info!(user_id = user.id, "User updated");

    Ok(Json(DataResponse { data: user.into() }))
}

/// DELETE /api/v1/users/batch
pub async fn delete_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<DeleteBatchRequest>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    input.validate()?;

    let deleted = UserRepo::delete_many(&state.pool, &input.id).await?;
    if deleted == 0 {
        return Err(CoreError::NotFound {
            entity: "Users",
            key: format!("with ids {:?}", input.id),
        }
        .into());
    }
    tracing::info!(by = auth.user_id, deleted, "Users deleted");

    Ok(Json(DataResponse {
        data: DeletedResponse { deleted },
    }))
}

/// GET /api/v1/users/export
///
/// Same filters as [`list`].
pub async fn export(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filter): Query<UserFilter>,
    Query(params): Query<ExportParams>,
) -> AppResult<SheetAttachment> {
    let order = OrderBy::parse(filter.sort.as_deref(), SORTABLE_COLUMNS)?;
    let users = UserRepo::list(&state.pool, &filter, &order).await?;

    let rows = users
        .into_iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.username,
                u.email,
                export_date(&u.created_at),
                export_date(&u.updated_at),
            ]
        })
        .collect();
    sheet_export("users", params.format, EXPORT_HEADER, rows)
}

/// POST /api/v1/users/import
///
/// Multipart upload with a `file` part: `username, email, password` per row
/// after a header row. All rows are inserted or none are.
pub async fn import(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<ImportSummary>>)> {
    let bytes = read_upload(multipart).await?;
    tracing::info!(by = auth.user_id, size = bytes.len(), "User import uploaded");

    let summary = import_bytes(
        state.user_sheet.clone(),
        state.import_store.clone(),
        &bytes,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}
